use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gemini returned no content{}", .block_reason.as_ref().map(|r| format!(" (blocked: {r})")).unwrap_or_default())]
    EmptyResponse { block_reason: Option<String> },
}

pub type Result<T> = std::result::Result<T, GeminiError>;
