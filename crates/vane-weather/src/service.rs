//! Cache-first weather lookups.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::CacheStore;
use crate::client::WeatherFetcher;
use crate::error::WeatherError;
use crate::metrics::MetricsSink;
use crate::types::WeatherRecord;

/// Cache-first facade over an upstream weather source.
///
/// All collaborators are injected; the service holds no global state and
/// can be constructed per process or per request as the caller prefers.
pub struct WeatherService {
    cache: Arc<CacheStore>,
    fetcher: Arc<dyn WeatherFetcher>,
    metrics: Arc<dyn MetricsSink>,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(
        cache: Arc<CacheStore>,
        fetcher: Arc<dyn WeatherFetcher>,
        metrics: Arc<dyn MetricsSink>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            fetcher,
            metrics,
            ttl,
        }
    }

    /// Cache key for a city. Case-folded so "London" and "LONDON" share
    /// one entry.
    fn cache_key(city: &str) -> String {
        format!("weather:{}", city.trim().to_lowercase())
    }

    /// Current conditions for one city, served from cache when possible.
    ///
    /// On a miss the upstream source is asked exactly once; a successful
    /// result is cached for the configured TTL, a failure is not cached
    /// at all, so the next call for the same city tries again.
    pub async fn weather_for(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        let key = Self::cache_key(city);

        if let Some(raw) = self.cache.get(&key) {
            match serde_json::from_str::<WeatherRecord>(&raw) {
                Ok(record) => {
                    self.metrics.cache_hit(&key);
                    tracing::debug!("Cache hit for {}", key);
                    return Ok(record);
                }
                Err(e) => {
                    // An entry we can no longer read is as good as absent.
                    tracing::warn!("Discarding unreadable cache entry for {}: {}", key, e);
                }
            }
        }

        self.metrics.cache_miss(&key);
        tracing::debug!("Cache miss for {}, fetching", key);

        let started = Instant::now();
        let record = self.fetcher.fetch(city.trim()).await?;
        self.metrics.fetch_latency(&record.city, started.elapsed());

        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, raw, self.ttl) {
                    tracing::warn!("Could not cache weather for {}: {}", key, e);
                }
            }
            Err(e) => {
                tracing::warn!("Could not serialize weather for {}: {}", key, e);
            }
        }

        Ok(record)
    }
}
