use std::time::Duration;

use be_api_core::config::{non_empty, upstream_timeout};

use crate::error::GeminiError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_VISION_MODEL: &str = "gemini-pro-vision";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub vision_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GeminiError> {
        let api_key = non_empty(&lookup, "GOOGLE_GEMINI_API_KEY")
            .ok_or(GeminiError::MissingEnvVar("GOOGLE_GEMINI_API_KEY"))?;

        let base_url = non_empty(&lookup, "GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            model: non_empty(&lookup, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            vision_model: non_empty(&lookup, "GEMINI_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            timeout: upstream_timeout(&lookup),
        })
    }
}
