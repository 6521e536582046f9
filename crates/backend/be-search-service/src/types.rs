use std::borrow::Cow;

use be_api_core::rules::{calendar_date, date_order, one_of, whole_number};
use be_api_core::{ApiResult, RequestSchema, require, require_date};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Provider response body reduced to its payload. Amadeus nests results
/// under `data`, the Booking search endpoint under `result`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderPayload {
    #[serde(default, alias = "result")]
    pub data: Value,
}

impl From<Value> for ProviderPayload {
    fn from(data: Value) -> Self {
        Self { data }
    }
}

// ============================================================================
// Flights
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TravelClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl TravelClass {
    pub const NAMES: &'static [&'static str] = &["ECONOMY", "PREMIUM_ECONOMY", "BUSINESS", "FIRST"];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelClass::Economy => "ECONOMY",
            TravelClass::PremiumEconomy => "PREMIUM_ECONOMY",
            TravelClass::Business => "BUSINESS",
            TravelClass::First => "FIRST",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "ECONOMY" => Some(TravelClass::Economy),
            "PREMIUM_ECONOMY" => Some(TravelClass::PremiumEconomy),
            "BUSINESS" => Some(TravelClass::Business),
            "FIRST" => Some(TravelClass::First),
            _ => None,
        }
    }
}

fn check_travel_class(value: &str) -> Result<(), ValidationError> {
    one_of(value, TravelClass::NAMES)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "FlightSearchRequest::check_dates", skip_on_field_errors = false))]
pub struct FlightSearchRequest {
    #[validate(required, length(equal = 3))]
    pub origin: Option<String>,
    #[validate(required, length(equal = 3))]
    pub destination: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub departure_date: Option<String>,
    #[validate(custom(function = "calendar_date"))]
    pub return_date: Option<String>,
    #[validate(required, range(min = 1.0), custom(function = "whole_number"))]
    pub adults: Option<f64>,
    #[validate(range(min = 0.0), custom(function = "whole_number"))]
    pub children: Option<f64>,
    #[validate(custom(function = "check_travel_class"))]
    pub travel_class: Option<String>,
}

impl FlightSearchRequest {
    fn check_dates(&self) -> Result<(), ValidationError> {
        date_order(
            self.departure_date.as_deref(),
            self.return_date.as_deref(),
            "returnDate",
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: i64,
    pub children: Option<i64>,
    pub travel_class: TravelClass,
}

impl RequestSchema for FlightSearchRequest {
    type Params = FlightSearchParams;

    fn normalize(self) -> ApiResult<FlightSearchParams> {
        let return_date = match self.return_date {
            Some(raw) => Some(require_date("returnDate", Some(raw))?),
            None => None,
        };

        Ok(FlightSearchParams {
            origin: require("origin", self.origin)?,
            destination: require("destination", self.destination)?,
            departure_date: require_date("departureDate", self.departure_date)?,
            return_date,
            adults: require("adults", self.adults)? as i64,
            children: self.children.map(|n| n as i64),
            travel_class: self
                .travel_class
                .as_deref()
                .and_then(TravelClass::from_name)
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FlightPriceRequest {
    #[validate(required, custom(function = "check_flight_offer"))]
    pub flight_offer: Option<Value>,
}

fn check_flight_offer(value: &Value) -> Result<(), ValidationError> {
    match value.as_object() {
        Some(offer) if !offer.is_empty() => Ok(()),
        _ => Err(ValidationError::new("invalid_type")
            .with_message(Cow::Borrowed("Must be a flight offer object"))),
    }
}

impl RequestSchema for FlightPriceRequest {
    /// The offer exactly as returned by a previous search.
    type Params = Value;

    fn normalize(self) -> ApiResult<Value> {
        require("flightOffer", self.flight_offer)
    }
}

// ============================================================================
// Hotels
// ============================================================================

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "HotelSearchRequest::check_dates", skip_on_field_errors = false))]
pub struct HotelSearchRequest {
    #[validate(required, length(min = 1))]
    pub destination: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub check_in: Option<String>,
    #[validate(required, custom(function = "calendar_date"))]
    pub check_out: Option<String>,
    #[validate(required, range(min = 1.0), custom(function = "whole_number"))]
    pub adults: Option<f64>,
    #[validate(required, range(min = 1.0), custom(function = "whole_number"))]
    pub rooms: Option<f64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
}

impl HotelSearchRequest {
    fn check_dates(&self) -> Result<(), ValidationError> {
        date_order(
            self.check_in.as_deref(),
            self.check_out.as_deref(),
            "checkOut",
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HotelSearchParams {
    /// Provider destination id for the city.
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i64,
    pub rooms: i64,
    pub currency: String,
}

impl RequestSchema for HotelSearchRequest {
    type Params = HotelSearchParams;

    fn normalize(self) -> ApiResult<HotelSearchParams> {
        Ok(HotelSearchParams {
            destination: require("destination", self.destination)?,
            check_in: require_date("checkIn", self.check_in)?,
            check_out: require_date("checkOut", self.check_out)?,
            adults: require("adults", self.adults)? as i64,
            rooms: require("rooms", self.rooms)? as i64,
            currency: self
                .currency
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        })
    }
}

/// Path parameters of `GET /hotels/{hotelId}`, routed through the same
/// pipeline as bodies.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailsRequest {
    #[validate(required, custom(function = "check_hotel_id"))]
    pub hotel_id: Option<String>,
}

fn check_hotel_id(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::new("invalid_format")
        .with_message(Cow::Borrowed("Must be a numeric hotel id")))
}

impl RequestSchema for HotelDetailsRequest {
    type Params = String;

    fn normalize(self) -> ApiResult<String> {
        require("hotelId", self.hotel_id)
    }
}

#[cfg(test)]
mod tests {
    use be_api_core::{ApiError, validate_value};
    use serde_json::json;

    use super::*;

    fn violations(err: ApiError) -> Vec<(String, String)> {
        match err {
            ApiError::Validation(v) => v
                .into_iter()
                .map(|v| (v.dotted_path(), v.code))
                .collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn pair(path: &str, code: &str) -> (String, String) {
        (path.to_string(), code.to_string())
    }

    #[test]
    fn flight_search_defaults_travel_class() {
        let params = validate_value::<FlightSearchRequest>(json!({
            "origin": "JFK",
            "destination": "LAX",
            "departureDate": "2024-06-01",
            "adults": 1
        }))
        .unwrap();

        assert_eq!(params.travel_class, TravelClass::Economy);
        assert_eq!(params.return_date, None);
        assert_eq!(
            params.departure_date,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn flight_search_reports_each_bad_field() {
        let err = validate_value::<FlightSearchRequest>(json!({
            "origin": "JFKX",
            "departureDate": "2024-13-01",
            "adults": 0,
            "children": -1,
            "travelClass": "COACH"
        }))
        .unwrap_err();

        assert_eq!(
            violations(err),
            vec![
                pair("adults", "range"),
                pair("children", "range"),
                pair("departureDate", "invalid_date"),
                pair("destination", "required"),
                pair("origin", "length"),
                pair("travelClass", "invalid_enum_value"),
            ]
        );
    }

    #[test]
    fn flight_search_rejects_return_before_departure() {
        let err = validate_value::<FlightSearchRequest>(json!({
            "origin": "JFK",
            "destination": "LAX",
            "departureDate": "2024-06-10",
            "returnDate": "2024-06-01",
            "adults": 2
        }))
        .unwrap_err();

        assert_eq!(violations(err), vec![pair("returnDate", "end_before_start")]);
    }

    #[test]
    fn counts_accept_integral_floats_only() {
        let params = validate_value::<FlightSearchRequest>(json!({
            "origin": "JFK",
            "destination": "LAX",
            "departureDate": "2024-06-01",
            "adults": 2.0,
            "children": 1
        }))
        .unwrap();
        assert_eq!(params.adults, 2);
        assert_eq!(params.children, Some(1));

        let err = validate_value::<HotelSearchRequest>(json!({
            "destination": "-1456928",
            "checkIn": "2024-07-01",
            "checkOut": "2024-07-04",
            "adults": 2.5,
            "rooms": 1.0
        }))
        .unwrap_err();
        assert_eq!(violations(err), vec![pair("adults", "invalid_type")]);
    }

    #[test]
    fn adults_must_be_a_number() {
        let err = validate_value::<FlightSearchRequest>(json!({
            "origin": "JFK",
            "destination": "LAX",
            "departureDate": "2024-06-01",
            "adults": "one"
        }))
        .unwrap_err();

        assert_eq!(violations(err), vec![pair("adults", "invalid_type")]);
    }

    #[test]
    fn flight_price_needs_an_offer_object() {
        let err = validate_value::<FlightPriceRequest>(json!({ "flightOffer": "offer-1" }))
            .unwrap_err();
        assert_eq!(violations(err), vec![pair("flightOffer", "invalid_type")]);

        let offer = validate_value::<FlightPriceRequest>(json!({
            "flightOffer": { "id": "1", "type": "flight-offer" }
        }))
        .unwrap();
        assert_eq!(offer["id"], "1");
    }

    #[test]
    fn hotel_search_defaults_currency() {
        let params = validate_value::<HotelSearchRequest>(json!({
            "destination": "-1456928",
            "checkIn": "2024-07-01",
            "checkOut": "2024-07-04",
            "adults": 2,
            "rooms": 1
        }))
        .unwrap();
        assert_eq!(params.currency, "USD");
    }

    #[test]
    fn hotel_search_checks_currency_and_rooms() {
        let err = validate_value::<HotelSearchRequest>(json!({
            "destination": "-1456928",
            "checkIn": "2024-07-01",
            "checkOut": "2024-07-04",
            "adults": 2,
            "rooms": 0,
            "currency": "EURO"
        }))
        .unwrap_err();

        assert_eq!(
            violations(err),
            vec![pair("currency", "length"), pair("rooms", "range")]
        );
    }

    #[test]
    fn hotel_id_must_be_numeric() {
        let err = validate_value::<HotelDetailsRequest>(json!({ "hotelId": "abc" })).unwrap_err();
        assert_eq!(violations(err), vec![pair("hotelId", "invalid_format")]);

        let id = validate_value::<HotelDetailsRequest>(json!({ "hotelId": "1377073" })).unwrap();
        assert_eq!(id, "1377073");
    }

    #[test]
    fn payload_accepts_either_envelope_key() {
        let amadeus: ProviderPayload =
            serde_json::from_value(json!({ "data": [1], "meta": {} })).unwrap();
        let booking: ProviderPayload =
            serde_json::from_value(json!({ "result": [2], "count": 1 })).unwrap();
        assert_eq!(amadeus.data, json!([1]));
        assert_eq!(booking.data, json!([2]));
    }
}
