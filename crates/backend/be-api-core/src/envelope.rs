use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Success wrapper rendered as `{ "<resource>": <payload> }`.
#[derive(Debug)]
pub struct Envelope<T> {
    status: StatusCode,
    resource: &'static str,
    payload: T,
}

impl<T: Serialize> Envelope<T> {
    /// 200 response for reads and generated content.
    pub fn ok(resource: &'static str, payload: T) -> Self {
        Self {
            status: StatusCode::OK,
            resource,
            payload,
        }
    }

    /// 201 response for newly persisted records.
    pub fn created(resource: &'static str, payload: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            resource,
            payload,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.resource, &self.payload)?;
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
