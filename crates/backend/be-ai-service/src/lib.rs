//! AI travel assistant routes backed by Gemini.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod prompts;
pub mod service;
pub mod types;

use client::GenerativeModel;
use service::AppState;

/// Images travel inline as base64, so the limit is well above the default.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router<M: GenerativeModel>(state: Arc<AppState<M>>) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat::<M>))
        .route("/itinerary", post(handlers::create_itinerary::<M>))
        .route("/recommendations", post(handlers::recommendations::<M>))
        .route("/image/analyze", post(handlers::analyze_image::<M>))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_ai_service() -> Result<Router> {
    debug!("Initializing AI service");

    let state = Arc::new(AppState::from_env().context("Failed to create AI service state")?);

    Ok(create_router(state))
}

pub use client::GeminiClient;
pub use config::GeminiConfig;
pub use error::GeminiError;
