use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{FromRequest, Query, Request};
use axum::http::{Method, Uri};
use serde_json::{Map, Value};

use crate::error::{ApiError, Violation};
use crate::schema::{RequestSchema, validate_value};

/// Extractor that reads the request payload (query string for `GET`, JSON
/// body otherwise), validates it against `T` and yields `T::Params`.
///
/// Rejections are [`ApiError`]s, so a failed extraction produces the same
/// envelope as any other client error.
pub struct Validated<T: RequestSchema>(pub T::Params);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = if req.method() == Method::GET {
            query_value(req.uri())?
        } else {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            body_value(&bytes)?
        };

        validate_value::<T>(value).map(Validated)
    }
}

/// Query values always arrive as strings.
fn query_value(uri: &Uri) -> Result<Value, ApiError> {
    let Query(pairs) = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    Ok(Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    ))
}

/// An empty body is treated as an empty object so that missing fields are
/// reported individually.
fn body_value(bytes: &[u8]) -> Result<Value, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(bytes).map_err(|err| {
        tracing::debug!(error = %err, "Request body is not valid JSON");
        ApiError::Validation(vec![Violation::new(
            Vec::new(),
            "invalid_json",
            "Request body must be valid JSON",
        )])
    })
}
