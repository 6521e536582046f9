//! Booking.com hotel search through RapidAPI.

use std::future::Future;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::config::BookingConfig;
use crate::error::BookingError;
use crate::types::{HotelSearchParams, ProviderPayload};

const SEARCH_PATH: &str = "/v1/hotels/search";
const DETAILS_PATH: &str = "/v1/hotels/data";

pub trait HotelProvider: Send + Sync + 'static {
    fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> impl Future<Output = Result<ProviderPayload, BookingError>> + Send;

    fn hotel_details(
        &self,
        hotel_id: &str,
    ) -> impl Future<Output = Result<Value, BookingError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct BookingClient {
    http: reqwest::Client,
    config: BookingConfig,
}

impl BookingClient {
    pub fn new(config: BookingConfig) -> Result<Self, BookingError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BookingError> {
        let response = self
            .http
            .get(format!("{}{path}", self.config.base_url))
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, path, "Booking request failed");
            return Err(BookingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

impl HotelProvider for BookingClient {
    #[instrument(skip(self, params), fields(destination = %params.destination))]
    async fn search_hotels(
        &self,
        params: &HotelSearchParams,
    ) -> Result<ProviderPayload, BookingError> {
        let query = [
            ("dest_type", "city".to_string()),
            ("dest_id", params.destination.clone()),
            ("checkin_date", params.check_in.to_string()),
            ("checkout_date", params.check_out.to_string()),
            ("adults_number", params.adults.to_string()),
            ("room_number", params.rooms.to_string()),
            ("filter_by_currency", params.currency.clone()),
            ("order_by", "popularity".to_string()),
            ("units", "metric".to_string()),
            ("locale", "en-gb".to_string()),
        ];
        self.get(SEARCH_PATH, &query).await
    }

    #[instrument(skip(self))]
    async fn hotel_details(&self, hotel_id: &str) -> Result<Value, BookingError> {
        let query = [
            ("hotel_id", hotel_id.to_string()),
            ("locale", "en-gb".to_string()),
        ];
        self.get(DETAILS_PATH, &query).await
    }
}
