//! Amadeus Self-Service flight offers client.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::config::AmadeusConfig;
use crate::error::AmadeusError;
use crate::types::{FlightSearchParams, ProviderPayload};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";
const PRICING_PATH: &str = "/v1/shopping/flight-offers/pricing";
const MAX_OFFERS: u32 = 50;
/// Tokens are refreshed this long before the provider says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub trait FlightProvider: Send + Sync + 'static {
    fn search_offers(
        &self,
        params: &FlightSearchParams,
    ) -> impl Future<Output = Result<ProviderPayload, AmadeusError>> + Send;

    /// Confirms the current price of an offer returned by a search.
    fn price_offer(
        &self,
        offer: &Value,
    ) -> impl Future<Output = Result<ProviderPayload, AmadeusError>> + Send;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct AccessToken {
    value: String,
    refresh_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.refresh_at
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    title: Option<String>,
    detail: Option<String>,
}

fn error_message(body: String) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) else {
        return body;
    };
    parsed
        .errors
        .into_iter()
        .find_map(|e| e.detail.or(e.title))
        .or(parsed.error_description)
        .unwrap_or(body)
}

pub struct AmadeusClient {
    http: reqwest::Client,
    config: AmadeusConfig,
    token: RwLock<Option<AccessToken>>,
}

impl AmadeusClient {
    pub fn new(config: AmadeusConfig) -> Result<Self, AmadeusError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    /// Returns a cached bearer token, fetching a new one when the cached one
    /// is missing or close to expiry.
    async fn access_token(&self) -> Result<String, AmadeusError> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let mut slot = self.token.write().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn fetch_token(&self) -> Result<AccessToken, AmadeusError> {
        let response = self
            .http
            .post(format!("{}{TOKEN_PATH}", self.config.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.api_key.as_str()),
                ("client_secret", self.config.api_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response.text().await.unwrap_or_default());
            warn!(status = status.as_u16(), %message, "Amadeus token request failed");
            return Err(AmadeusError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await?;
        debug!(expires_in = body.expires_in, "Acquired Amadeus access token");
        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        Ok(AccessToken {
            value: body.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }

    async fn read_payload(
        &self,
        response: reqwest::Response,
    ) -> Result<ProviderPayload, AmadeusError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked or expired early; the next call fetches a new token.
            *self.token.write().await = None;
        }
        let message = error_message(response.text().await.unwrap_or_default());
        warn!(status = status.as_u16(), %message, "Amadeus request failed");
        Err(AmadeusError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl FlightProvider for AmadeusClient {
    #[instrument(skip(self, params), fields(origin = %params.origin, destination = %params.destination))]
    async fn search_offers(
        &self,
        params: &FlightSearchParams,
    ) -> Result<ProviderPayload, AmadeusError> {
        let token = self.access_token().await?;

        let mut query: Vec<(&str, String)> = vec![
            ("originLocationCode", params.origin.clone()),
            ("destinationLocationCode", params.destination.clone()),
            ("departureDate", params.departure_date.to_string()),
            ("adults", params.adults.to_string()),
            ("travelClass", params.travel_class.as_str().to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(return_date) = params.return_date {
            query.push(("returnDate", return_date.to_string()));
        }
        if let Some(children) = params.children {
            query.push(("children", children.to_string()));
        }

        let response = self
            .http
            .get(format!("{}{FLIGHT_OFFERS_PATH}", self.config.base_url))
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        self.read_payload(response).await
    }

    #[instrument(skip_all)]
    async fn price_offer(&self, offer: &Value) -> Result<ProviderPayload, AmadeusError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(format!("{}{PRICING_PATH}", self.config.base_url))
            .bearer_auth(token)
            .json(&json!({
                "data": {
                    "type": "flight-offers-pricing",
                    "flightOffers": [offer],
                }
            }))
            .send()
            .await?;

        self.read_payload(response).await
    }
}
