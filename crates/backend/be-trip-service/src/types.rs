use be_api_core::rules::{calendar_date, date_order};
use be_api_core::{ApiError, ApiResult, RequestSchema, non_blank_str, require, require_date};
use be_remote_db::NewTrip;
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

const USER_ID_REQUIRED: &str = "userId is required";

fn check_user_id(raw: &Value) -> ApiResult<()> {
    match non_blank_str(raw, "userId") {
        Some(_) => Ok(()),
        None => Err(ApiError::bad_request(USER_ID_REQUIRED)),
    }
}

/// Query string of `GET /trips`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TripListQuery {
    pub user_id: Option<String>,
}

impl RequestSchema for TripListQuery {
    type Params = String;

    fn precheck(raw: &Value) -> ApiResult<()> {
        check_user_id(raw)
    }

    fn normalize(self) -> ApiResult<String> {
        require("userId", self.user_id)
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "CreateTripRequest::check_dates", skip_on_field_errors = false))]
pub struct CreateTripRequest {
    pub user_id: Option<String>,
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    #[validate(required, length(min = 1))]
    pub destination: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub start_date: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub end_date: Option<String>,
    #[validate(range(min = 0.0))]
    pub budget: Option<f64>,
    pub description: Option<String>,
}

impl CreateTripRequest {
    fn check_dates(&self) -> Result<(), ValidationError> {
        date_order(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            "endDate",
        )
    }
}

impl RequestSchema for CreateTripRequest {
    type Params = NewTrip;

    /// Ownership is checked before any field rule.
    fn precheck(raw: &Value) -> ApiResult<()> {
        check_user_id(raw)
    }

    fn normalize(self) -> ApiResult<NewTrip> {
        Ok(NewTrip {
            user_id: require("userId", self.user_id)?,
            title: require("title", self.title)?,
            destination: require("destination", self.destination)?,
            start_date: require_date("startDate", self.start_date)?,
            end_date: require_date("endDate", self.end_date)?,
            budget: self.budget,
            description: self.description,
        })
    }
}
