//! Request schemas and normalized parameters for the assistant routes.

use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use be_api_core::rules::{calendar_date, one_of};
use be_api_core::{ApiError, ApiResult, RequestSchema, Violation, require, require_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

pub const BUDGET_LEVELS: &[&str] = &["budget", "moderate", "luxury"];
pub const IMAGE_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
];
const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatParams {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

impl RequestSchema for ChatRequest {
    type Params = ChatParams;

    fn precheck(raw: &Value) -> ApiResult<()> {
        match raw.get("message").and_then(Value::as_str) {
            Some(message) if !message.is_empty() => Ok(()),
            _ => Err(ApiError::bad_request("Message is required")),
        }
    }

    fn normalize(self) -> ApiResult<ChatParams> {
        Ok(ChatParams {
            message: require("message", self.message)?,
            history: self.history.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Itinerary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
    Relaxed,
    Moderate,
    Packed,
}

/// What the traveller told us about their taste. Every field is optional;
/// absent lists are empty and absent scalars stay unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelPreferences {
    #[validate(custom(function = "check_budget_level"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_level: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub travel_style: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<Pace>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dietary: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accessibility: Vec<String>,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A reversed range is accepted; the prompt then asks for a single day.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    #[validate(required, length(min = 1))]
    pub destination: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub start_date: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub end_date: Option<String>,
    #[validate(nested)]
    pub preferences: Option<TravelPreferences>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryParams {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub preferences: TravelPreferences,
}

impl ItineraryParams {
    /// Whole days between start and end, never less than one.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(1)
    }
}

impl RequestSchema for ItineraryRequest {
    type Params = ItineraryParams;

    fn normalize(self) -> ApiResult<ItineraryParams> {
        Ok(ItineraryParams {
            destination: require("destination", self.destination)?,
            start_date: require_date("startDate", self.start_date)?,
            end_date: require_date("endDate", self.end_date)?,
            preferences: self.preferences.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(required, length(min = 1))]
    pub destination: Option<String>,
    #[validate(required)]
    pub interests: Option<Vec<String>>,
    #[validate(required, length(min = 1))]
    pub budget: Option<String>,
    #[validate(required, range(min = 1.0))]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    pub destination: String,
    pub interests: Vec<String>,
    pub budget: String,
    /// Days. Any JSON number of at least one.
    pub duration: f64,
}

impl RequestSchema for RecommendationRequest {
    type Params = RecommendationParams;

    fn normalize(self) -> ApiResult<RecommendationParams> {
        Ok(RecommendationParams {
            destination: require("destination", self.destination)?,
            interests: require("interests", self.interests)?,
            budget: require("budget", self.budget)?,
            duration: require("duration", self.duration)?,
        })
    }
}

// ============================================================================
// Image analysis
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysisRequest {
    #[validate(required, custom(function = "check_base64_image"))]
    pub image_data: Option<String>,
    #[validate(custom(function = "check_image_mime_type"))]
    pub mime_type: Option<String>,
}

/// Base64 image payload ready to be sent inline to the vision model.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl RequestSchema for ImageAnalysisRequest {
    type Params = InlineImage;

    fn normalize(self) -> ApiResult<InlineImage> {
        let raw = require("imageData", self.image_data)?;
        let (url_mime, data) = split_data_url(&raw);
        let mime_type = match (self.mime_type, url_mime) {
            (Some(mime), _) => mime,
            (None, Some(mime)) => {
                check_image_mime_type(mime).map_err(|err| {
                    ApiError::Validation(vec![Violation::field(
                        "imageData",
                        err.code.as_ref(),
                        "Data URL must carry a supported image type",
                    )])
                })?;
                mime.to_string()
            }
            (None, None) => DEFAULT_IMAGE_MIME_TYPE.to_string(),
        };

        Ok(InlineImage {
            mime_type,
            data: data.to_string(),
        })
    }
}

/// Splits `data:image/png;base64,AAAA` into its mime type and payload.
/// Plain base64 passes through untouched.
fn split_data_url(value: &str) -> (Option<&str>, &str) {
    let Some(rest) = value.strip_prefix("data:") else {
        return (None, value);
    };
    match rest.split_once(";base64,") {
        Some((mime, data)) => (Some(mime), data),
        None => (None, value),
    }
}

fn check_base64_image(value: &str) -> Result<(), ValidationError> {
    let (_, data) = split_data_url(value);
    if data.is_empty() {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Image data must not be empty")));
    }
    STANDARD.decode(data).map(|_| ()).map_err(|_| {
        ValidationError::new("invalid_base64")
            .with_message(Cow::Borrowed("Image data must be base64 encoded"))
    })
}

fn check_image_mime_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, IMAGE_MIME_TYPES)
}

fn check_budget_level(value: &str) -> Result<(), ValidationError> {
    one_of(value, BUDGET_LEVELS)
}
