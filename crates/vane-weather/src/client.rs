//! OpenWeatherMap client for current conditions.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{Conditions, Temperature, WeatherRecord, Wind};
use crate::units::compass_direction;

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upstream weather source for one city at a time.
///
/// Rate limits, auth, and the wire protocol are the implementation's
/// concern; callers only see a record or [`WeatherError::UpstreamUnavailable`].
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, WeatherError>;
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE)
    }

    /// Client against a non-default endpoint, e.g. a proxy or a mock
    /// server in tests.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let unavailable = || WeatherError::UpstreamUnavailable { city: city.to_string() };

        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Weather request for {} failed: {}", city, e);
                unavailable()
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Weather source returned {} for {}", status, city);
            return Err(unavailable());
        }

        let body: ApiResponse = response.json().await.map_err(|e| {
            tracing::warn!("Weather payload for {} could not be parsed: {}", city, e);
            unavailable()
        })?;

        let condition = body.weather.into_iter().next().ok_or_else(|| {
            tracing::warn!("Weather payload for {} had no conditions", city);
            unavailable()
        })?;

        Ok(WeatherRecord {
            city: body.name,
            temperature: Temperature::from_kelvin(body.main.temp),
            conditions: Conditions {
                main: condition.main,
                description: condition.description,
            },
            wind: Wind {
                speed: body.wind.speed,
                direction: compass_direction(body.wind.deg).to_string(),
            },
            humidity: body.main.humidity.min(100),
            fetched_at: Utc::now(),
        })
    }
}

// Wire format of /data/2.5/weather. Temperatures arrive in Kelvin,
// wind bearings in degrees.

#[derive(Debug, Deserialize)]
struct ApiResponse {
    name: String,
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiCondition>,
    #[serde(default)]
    wind: ApiWind,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    main: String,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}
