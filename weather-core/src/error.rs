use std::fmt;

use thiserror::Error;

/// Why a device location fix could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    /// The host has no location capability at all.
    Unsupported,
    /// The user (or platform policy) refused the request.
    Denied,
    /// No fix arrived before the timeout ceiling.
    TimedOut,
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocationFailure::Unsupported => "location capability not available",
            LocationFailure::Denied => "location request denied",
            LocationFailure::TimedOut => "location request timed out",
        })
    }
}

/// Every way a fetch attempt can fail. Each one is terminal for the attempt.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("location unavailable: {0}")]
    LocationUnavailable(LocationFailure),
}

/// Payload-free discriminant of [`WeatherError`], cheap to keep in view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    MalformedResponse,
    InvalidInput,
    LocationUnavailable,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Configuration(_) => ErrorKind::Configuration,
            WeatherError::Transport(_) => ErrorKind::Transport,
            WeatherError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            WeatherError::InvalidInput(_) => ErrorKind::InvalidInput,
            WeatherError::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }
}

impl ErrorKind {
    /// Text safe to show to a user. Transport and shape failures look the same.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Configuration => {
                "No API key configured.\nHint: run `weather configure` or set WEATHER_API_KEY."
            }
            ErrorKind::Transport | ErrorKind::MalformedResponse => {
                "Could not load weather data. Please try your search again."
            }
            ErrorKind::InvalidInput => "Please enter a location.",
            ErrorKind::LocationUnavailable => {
                "Your location is unavailable. Search for a place by name instead."
            }
        }
    }
}
