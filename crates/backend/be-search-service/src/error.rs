use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmadeusError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Amadeus authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Amadeus API returned {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Booking API returned {status}: {message}")]
    Api { status: u16, message: String },
}
