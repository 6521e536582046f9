use crate::amadeus::{AmadeusClient, FlightProvider};
use crate::booking::{BookingClient, HotelProvider};
use crate::config::{AmadeusConfig, BookingConfig};
use crate::error::{AmadeusError, BookingError};

pub struct FlightState<F: FlightProvider = AmadeusClient> {
    pub provider: F,
}

impl FlightState<AmadeusClient> {
    pub fn from_env() -> Result<Self, AmadeusError> {
        let provider = AmadeusClient::new(AmadeusConfig::from_env()?)?;
        Ok(Self { provider })
    }
}

impl<F: FlightProvider> FlightState<F> {
    pub fn new(provider: F) -> Self {
        Self { provider }
    }
}

pub struct HotelState<H: HotelProvider = BookingClient> {
    pub provider: H,
}

impl HotelState<BookingClient> {
    pub fn from_env() -> Result<Self, BookingError> {
        let provider = BookingClient::new(BookingConfig::from_env()?)?;
        Ok(Self { provider })
    }
}

impl<H: HotelProvider> HotelState<H> {
    pub fn new(provider: H) -> Self {
        Self { provider }
    }
}
