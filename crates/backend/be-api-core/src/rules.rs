//! Reusable field rules for `#[validate(custom(...))]` and
//! `#[validate(schema(...))]` attributes, plus the translation of
//! [`validator::ValidationErrors`] into the violation list sent to callers.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::{PathSegment, Violation};

/// Key under which `validator` stores struct-level (schema) failures.
const SCHEMA_KEY: &str = "__all__";

/// Parameter a schema rule sets to attach its failure to a specific field.
const FIELD_PARAM: &str = "field";

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into the calendar date it
/// names (in the timestamp's own offset).
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub fn calendar_date(value: &str) -> Result<(), ValidationError> {
    match parse_calendar_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_date")
            .with_message(Cow::Borrowed("Must be a valid calendar date (YYYY-MM-DD)"))),
    }
}

pub fn one_of(value: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_enum_value").with_message(Cow::Owned(format!(
        "Expected one of {}",
        allowed.join(", ")
    ))))
}

/// Counts arrive as any JSON number; `3.0` passes, `2.5` does not.
pub fn whole_number(value: impl std::borrow::Borrow<f64>) -> Result<(), ValidationError> {
    let value = *value.borrow();
    if value.is_finite() && value.fract() == 0.0 {
        return Ok(());
    }
    Err(ValidationError::new("invalid_type")
        .with_message(Cow::Borrowed("Expected a whole number")))
}

/// Rejects a range whose end precedes its start. Unparseable dates are left
/// to the per-field `calendar_date` rule.
pub fn date_order(
    start: Option<&str>,
    end: Option<&str>,
    end_field: &'static str,
) -> Result<(), ValidationError> {
    let (Some(start), Some(end)) = (
        start.and_then(parse_calendar_date),
        end.and_then(parse_calendar_date),
    ) else {
        return Ok(());
    };

    if end >= start {
        return Ok(());
    }

    let mut err = ValidationError::new("end_before_start").with_message(Cow::Owned(format!(
        "{end_field} must be on or after the start date"
    )));
    err.add_param(Cow::Borrowed(FIELD_PARAM), &end_field);
    Err(err)
}

/// Flattens nested validator output into a sorted violation list.
pub fn violations_from(errors: &ValidationErrors) -> Vec<Violation> {
    let mut out = Vec::new();
    collect(errors, &[], &mut out);
    out.sort_by_key(Violation::dotted_path);
    out
}

fn collect(errors: &ValidationErrors, prefix: &[PathSegment], out: &mut Vec<Violation>) {
    for (key, kind) in errors.errors() {
        let key = key.to_string();
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let path = if key == SCHEMA_KEY {
                        schema_path(prefix, err)
                    } else {
                        child_path(prefix, PathSegment::Key(camel_case(&key)))
                    };
                    out.push(Violation::new(path, err.code.to_string(), describe(err)));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                let path = child_path(prefix, PathSegment::Key(camel_case(&key)));
                collect(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                let base = child_path(prefix, PathSegment::Key(camel_case(&key)));
                for (index, nested) in items {
                    let path = child_path(&base, PathSegment::Index(*index));
                    collect(nested, &path, out);
                }
            }
        }
    }
}

fn child_path(prefix: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut path = prefix.to_vec();
    path.push(segment);
    path
}

fn schema_path(prefix: &[PathSegment], err: &ValidationError) -> Vec<PathSegment> {
    match err.params.get(FIELD_PARAM).and_then(|v| v.as_str()) {
        Some(field) => child_path(prefix, PathSegment::Key(field.to_owned())),
        None => prefix.to_vec(),
    }
}

/// Field names reach us in Rust casing; the wire uses camelCase.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let param = |name: &str| err.params.get(name).map(format_param);

    match err.code.as_ref() {
        "required" => "Required".to_owned(),
        "length" => {
            if let Some(equal) = param("equal") {
                format!("Must have a length of exactly {equal}")
            } else if let Some(min) = param("min") {
                format!("Must have a length of at least {min}")
            } else if let Some(max) = param("max") {
                format!("Must have a length of at most {max}")
            } else {
                "Invalid length".to_owned()
            }
        }
        "range" => {
            if let Some(min) = param("min") {
                format!("Must be greater than or equal to {min}")
            } else if let Some(max) = param("max") {
                format!("Must be less than or equal to {max}")
            } else {
                "Out of range".to_owned()
            }
        }
        other => format!("Failed rule '{other}'"),
    }
}

/// Renders whole-valued floats without a trailing `.0`.
fn format_param(value: &serde_json::Value) -> String {
    match value.as_f64() {
        Some(f) if value.is_f64() && f.fract() == 0.0 => format!("{}", f as i64),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(
            parse_calendar_date("2024-06-01"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(
            parse_calendar_date("2024-06-01T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date("next tuesday"), None);
    }

    #[test]
    fn whole_number_accepts_integral_floats() {
        assert!(whole_number(&3.0).is_ok());
        assert!(whole_number(&0.0).is_ok());
        assert_eq!(whole_number(&2.5).unwrap_err().code, "invalid_type");
    }

    #[test]
    fn one_of_lists_allowed_values() {
        assert!(one_of("FIRST", &["ECONOMY", "FIRST"]).is_ok());
        let err = one_of("STEERAGE", &["ECONOMY", "FIRST"]).unwrap_err();
        assert_eq!(err.code, "invalid_enum_value");
        assert_eq!(
            err.message.as_deref(),
            Some("Expected one of ECONOMY, FIRST")
        );
    }

    #[test]
    fn date_order_accepts_same_day_and_skips_bad_input() {
        assert!(date_order(Some("2024-06-01"), Some("2024-06-01"), "endDate").is_ok());
        assert!(date_order(Some("garbage"), Some("2024-06-01"), "endDate").is_ok());
        assert!(date_order(None, Some("2024-06-01"), "endDate").is_ok());

        let err = date_order(Some("2024-06-05"), Some("2024-06-01"), "endDate").unwrap_err();
        assert_eq!(err.code, "end_before_start");
    }

    #[derive(Validate)]
    #[validate(schema(function = "Sample::check_range", skip_on_field_errors = false))]
    struct Sample {
        #[validate(required, length(equal = 3))]
        airport_code: Option<String>,
        #[validate(range(min = 1))]
        party_size: Option<i64>,
        start: Option<String>,
        end: Option<String>,
    }

    impl Sample {
        fn check_range(&self) -> Result<(), ValidationError> {
            date_order(self.start.as_deref(), self.end.as_deref(), "end")
        }
    }

    #[test]
    fn flattens_field_and_schema_errors() {
        let sample = Sample {
            airport_code: None,
            party_size: Some(0),
            start: Some("2024-06-05".into()),
            end: Some("2024-06-01".into()),
        };
        let violations = violations_from(&sample.validate().unwrap_err());

        let summary: Vec<(String, String, String)> = violations
            .into_iter()
            .map(|v| (v.dotted_path(), v.code, v.message))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("airportCode".into(), "required".into(), "Required".into()),
                (
                    "end".into(),
                    "end_before_start".into(),
                    "end must be on or after the start date".into()
                ),
                (
                    "partySize".into(),
                    "range".into(),
                    "Must be greater than or equal to 1".into()
                ),
            ]
        );
    }

    #[test]
    fn length_message_uses_equal_param() {
        let sample = Sample {
            airport_code: Some("JFKX".into()),
            party_size: None,
            start: None,
            end: None,
        };
        let violations = violations_from(&sample.validate().unwrap_err());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Must have a length of exactly 3");
    }
}
