//! Concurrent fan-out across the configured cities.

use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::WeatherError;
use crate::service::WeatherService;
use crate::types::WeatherRecord;

/// Outcome of one fetch cycle.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Successful records, in input order.
    pub records: Vec<WeatherRecord>,
    /// Cities whose lookups failed, in input order.
    pub failed: Vec<String>,
}

impl BatchResult {
    /// True when some, but not all, cities failed.
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Runs one lookup per city and waits for every one of them to settle.
pub struct BatchFetcher {
    service: Arc<WeatherService>,
}

impl BatchFetcher {
    pub fn new(service: Arc<WeatherService>) -> Self {
        Self { service }
    }

    /// Fetch all cities concurrently.
    ///
    /// One city failing never cancels the others: every lookup runs to
    /// completion before results are partitioned. Duplicate cities each
    /// resolve on their own. With zero successes the whole cycle fails
    /// with [`WeatherError::AllSourcesUnavailable`].
    pub async fn fetch_all(&self, cities: &[String]) -> Result<BatchResult, WeatherError> {
        let mut tasks = JoinSet::new();
        for (index, city) in cities.iter().enumerate() {
            let service = Arc::clone(&self.service);
            let city = city.clone();
            tasks.spawn(async move { (index, service.weather_for(&city).await) });
        }

        // Collect by input slot, not by completion order.
        let mut outcomes: Vec<Option<Result<WeatherRecord, WeatherError>>> =
            cities.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => {
                    // The slot stays empty and is counted as a failure below.
                    tracing::error!("Weather lookup task died: {}", e);
                }
            }
        }

        let mut records = Vec::new();
        let mut failed = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some(Ok(record)) => records.push(record),
                Some(Err(e)) => {
                    tracing::warn!("Weather lookup for {} failed: {}", cities[index], e);
                    failed.push(cities[index].clone());
                }
                None => failed.push(cities[index].clone()),
            }
        }

        if records.is_empty() {
            return Err(WeatherError::AllSourcesUnavailable);
        }

        Ok(BatchResult { records, failed })
    }
}
