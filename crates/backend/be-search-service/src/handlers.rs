use std::sync::Arc;

use axum::extract::{Path, State};
use be_api_core::{ApiError, ApiResult, Envelope, Validated, validate_value};
use serde_json::{Value, json};
use tracing::instrument;

use crate::amadeus::FlightProvider;
use crate::booking::HotelProvider;
use crate::service::{FlightState, HotelState};
use crate::types::{
    FlightPriceRequest, FlightSearchRequest, HotelDetailsRequest, HotelSearchRequest,
};

// ---------------------------------------------------------------------------
// POST /flights/search
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(origin = %params.origin, destination = %params.destination))]
pub async fn search_flights<F: FlightProvider>(
    State(state): State<Arc<FlightState<F>>>,
    Validated(params): Validated<FlightSearchRequest>,
) -> ApiResult<Envelope<Value>> {
    let offers = state
        .provider
        .search_offers(&params)
        .await
        .map_err(ApiError::upstream("Failed to search flights"))?;

    Ok(Envelope::ok("flights", offers.data))
}

// ---------------------------------------------------------------------------
// POST /flights/price
// ---------------------------------------------------------------------------

#[instrument(skip_all)]
pub async fn price_flight<F: FlightProvider>(
    State(state): State<Arc<FlightState<F>>>,
    Validated(offer): Validated<FlightPriceRequest>,
) -> ApiResult<Envelope<Value>> {
    let pricing = state
        .provider
        .price_offer(&offer)
        .await
        .map_err(ApiError::upstream("Failed to price flight offer"))?;

    Ok(Envelope::ok("pricing", pricing.data))
}

// ---------------------------------------------------------------------------
// POST /hotels/search
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(destination = %params.destination))]
pub async fn search_hotels<H: HotelProvider>(
    State(state): State<Arc<HotelState<H>>>,
    Validated(params): Validated<HotelSearchRequest>,
) -> ApiResult<Envelope<Value>> {
    let hotels = state
        .provider
        .search_hotels(&params)
        .await
        .map_err(ApiError::upstream("Failed to search hotels"))?;

    Ok(Envelope::ok("hotels", hotels.data))
}

// ---------------------------------------------------------------------------
// GET /hotels/{hotelId}
// ---------------------------------------------------------------------------

#[instrument(skip(state))]
pub async fn hotel_details<H: HotelProvider>(
    State(state): State<Arc<HotelState<H>>>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Envelope<Value>> {
    let hotel_id = validate_value::<HotelDetailsRequest>(json!({ "hotelId": hotel_id }))?;

    let hotel = state
        .provider
        .hotel_details(&hotel_id)
        .await
        .map_err(ApiError::upstream("Failed to fetch hotel details"))?;

    Ok(Envelope::ok("hotel", hotel))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::error::{AmadeusError, BookingError};
    use crate::types::{FlightSearchParams, HotelSearchParams, ProviderPayload, TravelClass};

    #[derive(Default)]
    struct FakeFlights {
        fail: bool,
        searches: Mutex<Vec<FlightSearchParams>>,
    }

    impl FlightProvider for FakeFlights {
        async fn search_offers(
            &self,
            params: &FlightSearchParams,
        ) -> Result<ProviderPayload, AmadeusError> {
            self.searches.lock().unwrap().push(params.clone());
            if self.fail {
                return Err(AmadeusError::Api {
                    status: 500,
                    message: "upstream exploded at node 7".into(),
                });
            }
            Ok(json!([{ "id": "1", "price": { "total": "199.00" } }]).into())
        }

        async fn price_offer(&self, offer: &Value) -> Result<ProviderPayload, AmadeusError> {
            Ok(json!({ "type": "flight-offers-pricing", "flightOffers": [offer] }).into())
        }
    }

    #[derive(Default)]
    struct FakeHotels {
        fail: bool,
        searches: Mutex<Vec<HotelSearchParams>>,
    }

    impl HotelProvider for FakeHotels {
        async fn search_hotels(
            &self,
            params: &HotelSearchParams,
        ) -> Result<ProviderPayload, BookingError> {
            self.searches.lock().unwrap().push(params.clone());
            if self.fail {
                return Err(BookingError::Api {
                    status: 429,
                    message: "rapidapi quota exceeded for key abc123".into(),
                });
            }
            Ok(json!([{ "hotel_id": 1377073 }]).into())
        }

        async fn hotel_details(&self, hotel_id: &str) -> Result<Value, BookingError> {
            if hotel_id == "404" {
                return Err(BookingError::Api {
                    status: 404,
                    message: "not found".into(),
                });
            }
            Ok(json!({ "hotel_id": hotel_id, "name": "Hotel Lutetia" }))
        }
    }

    async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn flight_search_returns_provider_data() {
        let state = Arc::new(FlightState::new(FakeFlights::default()));
        let router = crate::create_flight_router(state.clone());

        let (status, body) = send(
            router,
            post_json(
                "/flights/search",
                json!({
                    "origin": "JFK",
                    "destination": "LAX",
                    "departureDate": "2024-06-01",
                    "adults": 1
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "flights": [{ "id": "1", "price": { "total": "199.00" } }] })
        );
        let searches = state.provider.searches.lock().unwrap();
        assert_eq!(searches[0].travel_class, TravelClass::Economy);
        assert_eq!(searches[0].origin, "JFK");
    }

    #[tokio::test]
    async fn invalid_flight_search_never_reaches_provider() {
        let state = Arc::new(FlightState::new(FakeFlights::default()));
        let router = crate::create_flight_router(state.clone());

        let (status, body) = send(
            router,
            post_json("/flights/search", json!({ "origin": "NYC", "adults": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let codes: Vec<&str> = body["error"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, ["range", "required", "required"]);
        assert!(state.provider.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn flight_search_failure_is_opaque() {
        let state = Arc::new(FlightState::new(FakeFlights {
            fail: true,
            ..Default::default()
        }));

        let (status, body) = send(
            crate::create_flight_router(state),
            post_json(
                "/flights/search",
                json!({
                    "origin": "JFK",
                    "destination": "LAX",
                    "departureDate": "2024-06-01",
                    "adults": 1
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to search flights" }));
    }

    #[tokio::test]
    async fn flight_price_echoes_pricing_payload() {
        let state = Arc::new(FlightState::new(FakeFlights::default()));

        let (status, body) = send(
            crate::create_flight_router(state),
            post_json("/flights/price", json!({ "flightOffer": { "id": "1" } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pricing"]["flightOffers"][0]["id"], "1");
    }

    #[tokio::test]
    async fn hotel_search_forwards_default_currency() {
        let state = Arc::new(HotelState::new(FakeHotels::default()));

        let (status, body) = send(
            crate::create_hotel_router(state.clone()),
            post_json(
                "/hotels/search",
                json!({
                    "destination": "-2601889",
                    "checkIn": "2024-07-01",
                    "checkOut": "2024-07-04",
                    "adults": 2,
                    "rooms": 1
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "hotels": [{ "hotel_id": 1377073 }] }));
        assert_eq!(state.provider.searches.lock().unwrap()[0].currency, "USD");
    }

    #[tokio::test]
    async fn hotel_search_failure_is_opaque() {
        let state = Arc::new(HotelState::new(FakeHotels {
            fail: true,
            ..Default::default()
        }));

        let (status, body) = send(
            crate::create_hotel_router(state.clone()),
            post_json(
                "/hotels/search",
                json!({
                    "destination": "-2601889",
                    "checkIn": "2024-07-01",
                    "checkOut": "2024-07-04",
                    "adults": 2,
                    "rooms": 1
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to search hotels" }));
        assert!(!body.to_string().contains("quota"));
        assert_eq!(state.provider.searches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn hotel_details_by_path() {
        let state = Arc::new(HotelState::new(FakeHotels::default()));
        let request = Request::builder()
            .uri("/hotels/1377073")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(crate::create_hotel_router(state), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hotel"]["name"], "Hotel Lutetia");
    }

    #[tokio::test]
    async fn hotel_details_rejects_non_numeric_id() {
        let state = Arc::new(HotelState::new(FakeHotels::default()));
        let request = Request::builder()
            .uri("/hotels/lutetia")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(crate::create_hotel_router(state), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"][0]["path"], json!(["hotelId"]));
    }

    #[tokio::test]
    async fn hotel_details_failure_is_opaque() {
        let state = Arc::new(HotelState::new(FakeHotels::default()));
        let request = Request::builder()
            .uri("/hotels/404")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(crate::create_hotel_router(state), request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch hotel details" }));
    }
}
