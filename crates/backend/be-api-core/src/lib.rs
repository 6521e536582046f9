//! Shared request boundary for the Wayfarer HTTP services.
//!
//! Every route follows the same pipeline: the [`Validated`] extractor parses
//! and checks the payload against a [`RequestSchema`], the handler makes one
//! call to an external client, and the outcome is rendered either as an
//! [`Envelope`] or as an [`ApiError`].

pub mod config;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod rules;
pub mod schema;

pub use envelope::Envelope;
pub use error::{ApiError, ApiResult, PathSegment, Violation};
pub use extract::Validated;
pub use schema::{RequestSchema, non_blank_str, require, require_date, validate_value};
