use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, Default)]
#[sqlx(type_name = "trip_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Planning,
    Booked,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripStatus::Planning => write!(f, "planning"),
            TripStatus::Booked => write!(f, "booked"),
            TripStatus::Completed => write!(f, "completed"),
            TripStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A persisted trip. Serialized in the camelCase shape the UI consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub status: TripStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Option<f64>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_serializes_camel_case_with_plain_dates() {
        let created_at = DateTime::from_timestamp(1_717_200_000, 0).unwrap();
        let trip = Trip {
            id: Uuid::nil(),
            user_id: "demo-user".into(),
            title: "Summer in Lisbon".into(),
            destination: "Lisbon".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 8).unwrap(),
            budget: Some(2500.0),
            status: TripStatus::Planning,
            description: None,
            created_at,
            updated_at: created_at,
        };

        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["userId"], "demo-user");
        assert_eq!(json["startDate"], "2024-06-01");
        assert_eq!(json["endDate"], "2024-06-08");
        assert_eq!(json["status"], "planning");
        assert!(json["description"].is_null());
    }

    #[test]
    fn status_displays_lowercase() {
        assert_eq!(TripStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(TripStatus::default(), TripStatus::Planning);
    }
}
