//! Weather pipeline error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The source could not produce data for one city. Recoverable at the
    /// batch level: the city is dropped from the cycle, nothing else is.
    #[error("Weather source unavailable for {city}")]
    UpstreamUnavailable { city: String },

    /// Every city in the batch failed. Fatal for the fetch cycle.
    #[error("Weather source unavailable for all requested cities")]
    AllSourcesUnavailable,

    /// Cache TTL of zero, or one past what the clock can represent.
    /// Rejected at the call boundary.
    #[error("Cache TTL out of range")]
    InvalidTtl,
}

impl WeatherError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable { city } => {
                format!("Weather data for {} could not be loaded.", city)
            }
            Self::AllSourcesUnavailable => {
                "Unable to fetch weather data for any cities. Please try again later.".to_string()
            }
            Self::InvalidTtl => "Invalid cache configuration.".to_string(),
        }
    }

    /// Whether the whole fetch cycle failed, as opposed to a single city.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AllSourcesUnavailable)
    }
}
