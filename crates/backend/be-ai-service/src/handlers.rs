use std::sync::Arc;

use axum::extract::State;
use be_api_core::{ApiError, ApiResult, Envelope, Validated};
use tracing::{info, instrument};

use crate::client::GenerativeModel;
use crate::prompts;
use crate::service::AppState;
use crate::types::{
    ChatParams, ChatRequest, ImageAnalysisRequest, ItineraryRequest, RecommendationRequest,
};

// ---------------------------------------------------------------------------
// POST /chat
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(history = params.history.len()))]
pub async fn chat<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    Validated(params): Validated<ChatRequest>,
) -> ApiResult<Envelope<String>> {
    let ChatParams { message, history } = params;
    let response = state
        .model
        .chat(&history, &message)
        .await
        .map_err(ApiError::upstream("Failed to process request"))?;

    Ok(Envelope::ok("response", response))
}

// ---------------------------------------------------------------------------
// POST /itinerary
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(destination = %params.destination))]
pub async fn create_itinerary<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    Validated(params): Validated<ItineraryRequest>,
) -> ApiResult<Envelope<String>> {
    info!(days = params.duration_days(), "Generating itinerary");

    let itinerary = state
        .model
        .generate(&prompts::itinerary(&params))
        .await
        .map_err(ApiError::upstream("Failed to generate itinerary"))?;

    Ok(Envelope::ok("itinerary", itinerary))
}

// ---------------------------------------------------------------------------
// POST /recommendations
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(destination = %params.destination, duration = params.duration))]
pub async fn recommendations<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    Validated(params): Validated<RecommendationRequest>,
) -> ApiResult<Envelope<String>> {
    let recommendations = state
        .model
        .generate(&prompts::recommendations(&params))
        .await
        .map_err(ApiError::upstream("Failed to generate recommendations"))?;

    Ok(Envelope::ok("recommendations", recommendations))
}

// ---------------------------------------------------------------------------
// POST /image/analyze
// ---------------------------------------------------------------------------

#[instrument(skip_all, fields(mime_type = %image.mime_type))]
pub async fn analyze_image<M: GenerativeModel>(
    State(state): State<Arc<AppState<M>>>,
    Validated(image): Validated<ImageAnalysisRequest>,
) -> ApiResult<Envelope<String>> {
    let analysis = state
        .model
        .describe_image(prompts::IMAGE_INSTRUCTION, &image)
        .await
        .map_err(ApiError::upstream("Failed to analyze image"))?;

    Ok(Envelope::ok("analysis", analysis))
}
