//! Flight and hotel search routes.
//!
//! Flights go to Amadeus, hotels to Booking.com. Each provider has its own
//! router and state so the server can run with only one of them configured.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod amadeus;
pub mod booking;
pub mod config;
pub mod error;
pub mod handlers;
pub mod service;
pub mod types;

use amadeus::FlightProvider;
use booking::HotelProvider;
use service::{FlightState, HotelState};

pub fn create_flight_router<F: FlightProvider>(state: Arc<FlightState<F>>) -> Router {
    Router::new()
        .route("/flights/search", post(handlers::search_flights::<F>))
        .route("/flights/price", post(handlers::price_flight::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_hotel_router<H: HotelProvider>(state: Arc<HotelState<H>>) -> Router {
    Router::new()
        .route("/hotels/search", post(handlers::search_hotels::<H>))
        .route("/hotels/{hotel_id}", get(handlers::hotel_details::<H>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_flight_service() -> Result<Router> {
    debug!("Initializing flight search service");

    let state = Arc::new(FlightState::from_env().context("Failed to create flight service state")?);

    Ok(create_flight_router(state))
}

pub fn init_hotel_service() -> Result<Router> {
    debug!("Initializing hotel search service");

    let state = Arc::new(HotelState::from_env().context("Failed to create hotel service state")?);

    Ok(create_hotel_router(state))
}

pub use amadeus::AmadeusClient;
pub use booking::BookingClient;
pub use config::{AmadeusConfig, BookingConfig};
pub use error::{AmadeusError, BookingError};
