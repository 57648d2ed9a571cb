//! Unit conversions for upstream payloads.
//!
//! OpenWeatherMap reports temperatures in Kelvin and wind bearings in
//! degrees; everything user-facing wants Celsius/Fahrenheit and compass
//! labels.

const KELVIN_OFFSET: f64 = 273.15;

/// Convert a temperature from Kelvin to Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

/// Convert a temperature from Kelvin to Fahrenheit.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0
}

/// Convert a temperature from Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// 16-point compass label for a wind bearing in degrees.
///
/// Bearings outside 0..360 are wrapped first, so negative input is fine.
pub fn compass_direction(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = degrees.rem_euclid(360.0);
    let index = ((normalized / 22.5) + 0.5) as usize % POINTS.len();
    POINTS[index]
}
