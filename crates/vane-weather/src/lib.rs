//! Weather acquisition and caching for Vane
//!
//! Fetches current conditions per city from OpenWeatherMap, caches
//! successful results with a TTL, and fans out batch lookups across
//! the configured cities without letting one failure sink the rest.

pub mod batch;
pub mod cache;
pub mod client;
pub mod error;
pub mod metrics;
pub mod service;
pub mod stats;
pub mod types;
pub mod units;

pub use batch::{BatchFetcher, BatchResult};
pub use cache::CacheStore;
pub use client::{OpenWeatherClient, WeatherFetcher};
pub use error::WeatherError;
pub use metrics::{CounterSink, MetricsSink, NoopSink};
pub use service::WeatherService;
pub use stats::{temperature_extremes, TemperatureExtremes};
pub use types::{Conditions, Temperature, WeatherRecord, Wind};
