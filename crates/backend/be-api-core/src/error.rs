use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{error, warn};

/// One step in the location of an offending value inside a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// A single field-level rule failure reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    pub code: String,
    pub message: String,
}

impl Violation {
    pub fn new(
        path: Vec<PathSegment>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Violation attached to a single top-level field.
    pub fn field(name: &str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![PathSegment::from(name)], code, message)
    }

    /// Dotted rendering of the path, used in logs.
    pub fn dotted_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{index}]"));
                }
            }
        }
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A precondition failed that is reported as a plain message.
    #[error("{0}")]
    BadRequest(String),

    /// One or more schema rules failed.
    #[error("request failed validation ({} violation(s))", .0.len())]
    Validation(Vec<Violation>),

    /// The external collaborator failed. `message` is the only text the
    /// caller ever sees.
    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Returns a mapper for `Result::map_err` that tags a provider failure with
    /// the generic message shown to callers.
    pub fn upstream<E>(message: &'static str) -> impl FnOnce(E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        move |err| Self::Upstream {
            message,
            source: err.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::Validation(_))
    }
}

impl From<Vec<Violation>> for ApiError {
    fn from(violations: Vec<Violation>) -> Self {
        Self::Validation(violations)
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Violations(Vec<Violation>),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(message) => {
                warn!(%message, "Rejected request");
                ErrorDetail::Message(message)
            }
            ApiError::Validation(violations) => {
                let fields: Vec<String> = violations.iter().map(Violation::dotted_path).collect();
                warn!(?fields, "Request failed validation");
                ErrorDetail::Violations(violations)
            }
            ApiError::Upstream { message, source } => {
                error!(error = ?source, "{}", message);
                ErrorDetail::Message(message.to_owned())
            }
        };

        (status, Json(ErrorBody { error: detail })).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
