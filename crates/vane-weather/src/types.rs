use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{celsius_to_fahrenheit, kelvin_to_celsius};

/// Temperature in both display scales.
///
/// Constructed through [`Temperature::from_kelvin`] or
/// [`Temperature::from_celsius`] so the two fields always agree
/// (fahrenheit = celsius * 9/5 + 32).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub celsius: f64,
    pub fahrenheit: f64,
}

impl Temperature {
    pub fn from_kelvin(kelvin: f64) -> Self {
        Self::from_celsius(kelvin_to_celsius(kelvin))
    }

    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
        }
    }
}

/// Sky conditions as reported by the source ("Clouds", "scattered clouds").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    pub main: String,
    pub description: String,
}

/// Wind speed in m/s plus a compass label for the bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub direction: String,
}

/// Current weather for one city.
///
/// Immutable once constructed; moves between the cache and batch results
/// by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: Temperature,
    pub conditions: Conditions,
    pub wind: Wind,
    /// Relative humidity, 0-100 percent
    pub humidity: u8,
    pub fetched_at: DateTime<Utc>,
}
