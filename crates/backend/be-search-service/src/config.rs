use std::time::Duration;

use be_api_core::config::{non_empty, upstream_timeout};

use crate::error::{AmadeusError, BookingError};

const DEFAULT_AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
const DEFAULT_BOOKING_BASE_URL: &str = "https://booking-com.p.rapidapi.com";
const DEFAULT_BOOKING_HOST: &str = "booking-com.p.rapidapi.com";

fn base_url(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    non_empty(lookup, key)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AmadeusConfig {
    pub fn from_env() -> Result<Self, AmadeusError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AmadeusError> {
        let api_key = non_empty(&lookup, "AMADEUS_API_KEY")
            .ok_or(AmadeusError::MissingEnvVar("AMADEUS_API_KEY"))?;
        let api_secret = non_empty(&lookup, "AMADEUS_API_SECRET")
            .ok_or(AmadeusError::MissingEnvVar("AMADEUS_API_SECRET"))?;

        Ok(Self {
            api_key,
            api_secret,
            base_url: base_url(&lookup, "AMADEUS_BASE_URL", DEFAULT_AMADEUS_BASE_URL),
            timeout: upstream_timeout(&lookup),
        })
    }
}

#[derive(Debug, Clone)]
pub struct BookingConfig {
    pub api_key: String,
    pub base_url: String,
    /// Value of the `X-RapidAPI-Host` header.
    pub api_host: String,
    pub timeout: Duration,
}

impl BookingConfig {
    pub fn from_env() -> Result<Self, BookingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BookingError> {
        let api_key = non_empty(&lookup, "BOOKING_COM_API_KEY")
            .ok_or(BookingError::MissingEnvVar("BOOKING_COM_API_KEY"))?;

        Ok(Self {
            api_key,
            base_url: base_url(&lookup, "BOOKING_COM_BASE_URL", DEFAULT_BOOKING_BASE_URL),
            api_host: non_empty(&lookup, "BOOKING_COM_API_HOST")
                .unwrap_or_else(|| DEFAULT_BOOKING_HOST.to_string()),
            timeout: upstream_timeout(&lookup),
        })
    }
}
