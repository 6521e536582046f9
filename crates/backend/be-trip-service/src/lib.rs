//! Trip planning routes over the relational store.

use std::sync::Arc;

use axum::{Router, routing::get};
use be_remote_db::DatabaseManager;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod handlers;
pub mod service;
pub mod store;
pub mod types;

use service::AppState;

pub fn create_router<S: TripStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route(
            "/trips",
            get(handlers::list_trips::<S>).post(handlers::create_trip::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_trip_service(db: Arc<DatabaseManager>) -> Router {
    debug!("Initializing trip service");

    create_router(Arc::new(AppState::new(db)))
}

pub use store::TripStore;
