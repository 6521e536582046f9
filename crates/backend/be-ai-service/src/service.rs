use crate::client::{GeminiClient, GenerativeModel};
use crate::config::GeminiConfig;
use crate::error::GeminiError;

pub struct AppState<M: GenerativeModel = GeminiClient> {
    pub model: M,
}

impl AppState<GeminiClient> {
    pub fn from_env() -> Result<Self, GeminiError> {
        let config = GeminiConfig::from_env()?;
        let model = GeminiClient::new(config)?;
        Ok(Self { model })
    }
}

impl<M: GenerativeModel> AppState<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }
}
