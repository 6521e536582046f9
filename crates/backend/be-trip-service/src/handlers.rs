use std::sync::Arc;

use axum::extract::State;
use be_api_core::{ApiError, ApiResult, Envelope, Validated};
use be_remote_db::Trip;
use tracing::{info, instrument};

use crate::service::AppState;
use crate::store::TripStore;
use crate::types::{CreateTripRequest, TripListQuery};

// ---------------------------------------------------------------------------
// GET /trips
// ---------------------------------------------------------------------------

#[instrument(skip(state))]
pub async fn list_trips<S: TripStore>(
    State(state): State<Arc<AppState<S>>>,
    Validated(user_id): Validated<TripListQuery>,
) -> ApiResult<Envelope<Vec<Trip>>> {
    let trips = state
        .store
        .list_trips(&user_id)
        .await
        .map_err(ApiError::upstream("Failed to fetch trips"))?;

    Ok(Envelope::ok("trips", trips))
}

// ---------------------------------------------------------------------------
// POST /trips
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(user_id = %new_trip.user_id))]
pub async fn create_trip<S: TripStore>(
    State(state): State<Arc<AppState<S>>>,
    Validated(new_trip): Validated<CreateTripRequest>,
) -> ApiResult<Envelope<Trip>> {
    let trip = state
        .store
        .create_trip(new_trip)
        .await
        .map_err(ApiError::upstream("Failed to create trip"))?;

    info!(trip_id = %trip.id, "Created trip");
    Ok(Envelope::created("trip", trip))
}
