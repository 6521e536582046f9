//! The validate-then-normalize pipeline shared by every route.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_path_to_error::Segment;
use validator::Validate;

use crate::error::{ApiError, ApiResult, PathSegment, Violation};
use crate::rules::{parse_calendar_date, violations_from};

/// Raw request shape for one endpoint.
///
/// Implementors declare every field as `Option` so that absence is reported
/// by the `required` rule (with the field's path) rather than by serde.
/// Type mismatches are still caught during deserialization.
pub trait RequestSchema: DeserializeOwned + Validate {
    /// Typed parameters handed to the external client.
    type Params;

    /// Checks that must short-circuit with a plain message before anything
    /// else, type checks included. Sees the payload exactly as received.
    fn precheck(_raw: &Value) -> ApiResult<()> {
        Ok(())
    }

    /// Converts an already-validated request into its parameters.
    fn normalize(self) -> ApiResult<Self::Params>;
}

/// Runs a raw JSON value through the schema for `T`. Pure and synchronous.
pub fn validate_value<T: RequestSchema>(value: Value) -> ApiResult<T::Params> {
    T::precheck(&value)?;
    // serde would otherwise accept a sequence as positional struct fields.
    if !value.is_object() {
        return Err(ApiError::Validation(vec![Violation::new(
            Vec::new(),
            "invalid_type",
            "Expected an object",
        )]));
    }
    let raw: T = serde_path_to_error::deserialize(value).map_err(type_violation)?;
    raw.validate()
        .map_err(|errors| ApiError::Validation(violations_from(&errors)))?;
    raw.normalize()
}

/// Non-blank string under `key`, if the payload is an object holding one.
pub fn non_blank_str<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Unwraps a field the `required` rule has already vouched for.
pub fn require<T>(field: &str, value: Option<T>) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::Validation(vec![Violation::field(field, "required", "Required")]))
}

/// Unwraps and parses a date field the `calendar_date` rule has already
/// vouched for.
pub fn require_date(field: &str, value: Option<String>) -> ApiResult<NaiveDate> {
    let raw = require(field, value)?;
    parse_calendar_date(&raw).ok_or_else(|| {
        ApiError::Validation(vec![Violation::field(
            field,
            "invalid_date",
            "Must be a valid calendar date (YYYY-MM-DD)",
        )])
    })
}

fn type_violation(err: serde_path_to_error::Error<serde_json::Error>) -> ApiError {
    let path = err
        .path()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Seq { index } => Some(PathSegment::Index(*index)),
            Segment::Map { key } => Some(PathSegment::Key(key.clone())),
            Segment::Enum { variant } => Some(PathSegment::Key(variant.clone())),
            Segment::Unknown => None,
        })
        .collect();

    ApiError::Validation(vec![Violation::new(
        path,
        "invalid_type",
        err.into_inner().to_string(),
    )])
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(rename_all = "camelCase")]
    struct GreetingRequest {
        #[validate(required, length(min = 1))]
        display_name: Option<String>,
        #[validate(range(min = 1))]
        repeat: Option<i64>,
        tags: Option<Vec<String>>,
    }

    #[derive(Debug, PartialEq)]
    struct Greeting {
        display_name: String,
        repeat: i64,
        tags: Vec<String>,
    }

    impl RequestSchema for GreetingRequest {
        type Params = Greeting;

        fn normalize(self) -> ApiResult<Greeting> {
            Ok(Greeting {
                display_name: require("displayName", self.display_name)?,
                repeat: self.repeat.unwrap_or(1),
                tags: self.tags.unwrap_or_default(),
            })
        }
    }

    fn violations(err: ApiError) -> Vec<Violation> {
        match err {
            ApiError::Validation(v) => v,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_and_normalizes_with_defaults() {
        let params =
            validate_value::<GreetingRequest>(json!({ "displayName": "Ada", "extra": true }))
                .unwrap();
        assert_eq!(
            params,
            Greeting {
                display_name: "Ada".into(),
                repeat: 1,
                tags: vec![],
            }
        );
    }

    #[test]
    fn missing_field_is_listed_by_path() {
        let err = validate_value::<GreetingRequest>(json!({})).unwrap_err();
        let v = violations(err);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].path, vec![PathSegment::from("displayName")]);
        assert_eq!(v[0].code, "required");
    }

    #[test]
    fn type_mismatch_reports_nested_path() {
        let err =
            validate_value::<GreetingRequest>(json!({ "displayName": "Ada", "tags": ["a", 7] }))
                .unwrap_err();
        let v = violations(err);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].code, "invalid_type");
        assert_eq!(v[0].dotted_path(), "tags[1]");
        assert!(!v[0].message.contains("line"));
    }

    #[test]
    fn collects_every_rule_failure() {
        let err =
            validate_value::<GreetingRequest>(json!({ "displayName": "", "repeat": 0 }))
                .unwrap_err();
        let paths: Vec<String> = violations(err).iter().map(Violation::dotted_path).collect();
        assert_eq!(paths, vec!["displayName", "repeat"]);
    }

    #[test]
    fn non_object_body_is_rejected_at_root() {
        for body in [json!([1, 2]), json!(["Ada", 2, ["a"]]), json!("Ada"), json!(null)] {
            let v = violations(validate_value::<GreetingRequest>(body).unwrap_err());
            assert_eq!(v.len(), 1);
            assert!(v[0].path.is_empty());
            assert_eq!(v[0].code, "invalid_type");
        }
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TicketRequest {
        #[validate(range(min = 1))]
        seats: Option<i64>,
    }

    impl RequestSchema for TicketRequest {
        type Params = i64;

        fn precheck(raw: &Value) -> ApiResult<()> {
            non_blank_str(raw, "owner")
                .map(|_| ())
                .ok_or_else(|| ApiError::bad_request("owner is required"))
        }

        fn normalize(self) -> ApiResult<i64> {
            Ok(self.seats.unwrap_or(1))
        }
    }

    #[test]
    fn precheck_wins_over_type_errors() {
        let err = validate_value::<TicketRequest>(json!({ "seats": "two" })).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "owner is required"));

        let err = validate_value::<TicketRequest>(json!([1])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let seats = validate_value::<TicketRequest>(json!({ "owner": "ada", "seats": 2 })).unwrap();
        assert_eq!(seats, 2);
    }
}
