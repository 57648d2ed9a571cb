//! Vane: terminal weather dashboard.
//!
//! Loads the configured city list, fetches current conditions for every
//! city concurrently, and prints a grid with the hottest and coldest
//! cities called out. `--watch` keeps refreshing on the configured
//! interval.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use vane_core::Config;
use vane_weather::{
    temperature_extremes, BatchFetcher, BatchResult, CacheStore, CounterSink, MetricsSink,
    OpenWeatherClient, WeatherFetcher, WeatherRecord, WeatherService,
};

/// City weather dashboard
#[derive(Parser)]
#[command(name = "vane", about = "City weather dashboard")]
struct Cli {
    /// Fetch these cities instead of the configured list.
    #[arg(long = "city", value_name = "NAME")]
    cities: Vec<String>,

    /// Keep running, refreshing on the configured interval.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    vane_core::init()?;

    let cli = Cli::parse();

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let cities = if cli.cities.is_empty() {
        config.cities.clone()
    } else {
        cli.cities
    };
    let api_key = config
        .source
        .effective_api_key()
        .context("No API key configured; set OPENWEATHER_API_KEY or edit the config file")?;

    let cache = Arc::new(CacheStore::new());
    let metrics = Arc::new(CounterSink::new()) as Arc<dyn MetricsSink>;
    let client = Arc::new(OpenWeatherClient::with_base_url(&api_key, &config.source.base_url))
        as Arc<dyn WeatherFetcher>;
    let service = Arc::new(WeatherService::new(
        cache,
        client,
        metrics,
        Duration::from_secs(config.cache.ttl_secs),
    ));
    let batch = BatchFetcher::new(service);

    info!("Fetching weather for {} cities", cities.len());

    if cli.watch {
        run_watch(&batch, &cities, config.refresh_minutes).await;
    } else if !run_cycle(&batch, &cities).await {
        std::process::exit(1);
    }

    Ok(())
}

/// One fetch-and-render cycle. Returns false when the whole cycle failed.
async fn run_cycle(batch: &BatchFetcher, cities: &[String]) -> bool {
    match batch.fetch_all(cities).await {
        Ok(result) => {
            render_dashboard(&result);
            true
        }
        Err(e) => {
            println!();
            println!("  {}", e.user_message());
            // Only a whole-cycle failure turns into a non-zero exit.
            !e.is_fatal()
        }
    }
}

async fn run_watch(batch: &BatchFetcher, cities: &[String], refresh_minutes: u32) {
    if refresh_minutes == 0 {
        // Refresh disabled in config; behave like a single run.
        run_cycle(batch, cities).await;
        return;
    }

    let period = Duration::from_secs(u64::from(refresh_minutes) * 60);
    loop {
        run_cycle(batch, cities).await;
        info!("Next refresh in {} minutes", refresh_minutes);

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }
}

fn render_dashboard(result: &BatchResult) {
    println!();
    println!("  Weather at {}", chrono::Local::now().format("%H:%M:%S"));
    println!();

    if result.is_partial() {
        println!(
            "  Some cities' weather data could not be loaded: {}",
            result.failed.join(", ")
        );
        println!();
    }

    for record in &result.records {
        println!("  {}", format_record(record));
    }

    if let Some(extremes) = temperature_extremes(&result.records) {
        println!();
        println!(
            "  Hottest: {} at {:.1}°F / Coldest: {} at {:.1}°F",
            extremes.hottest.city,
            extremes.hottest.temperature.fahrenheit,
            extremes.coldest.city,
            extremes.coldest.temperature.fahrenheit
        );
    }
    println!();
}

fn format_record(record: &WeatherRecord) -> String {
    format!(
        "{:<14} {:>5.1}°C / {:>5.1}°F   {} - {}   Wind: {} m/s {}   Humidity: {}%",
        record.city,
        record.temperature.celsius,
        record.temperature.fahrenheit,
        record.conditions.main,
        record.conditions.description,
        record.wind.speed,
        record.wind.direction,
        record.humidity
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use vane_weather::{Conditions, NoopSink, Temperature, WeatherError, Wind};

    fn sample_record(city: &str) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            temperature: Temperature::from_celsius(20.0),
            conditions: Conditions {
                main: "Clear".to_string(),
                description: "clear sky".to_string(),
            },
            wind: Wind {
                speed: 3.0,
                direction: "N".to_string(),
            },
            humidity: 50,
            fetched_at: Utc::now(),
        }
    }

    struct DownFetcher;

    #[async_trait]
    impl WeatherFetcher for DownFetcher {
        async fn fetch(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
            Err(WeatherError::UpstreamUnavailable { city: city.to_string() })
        }
    }

    struct FixedFetcher;

    #[async_trait]
    impl WeatherFetcher for FixedFetcher {
        async fn fetch(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
            Ok(sample_record(city))
        }
    }

    fn batch_over(fetcher: Arc<dyn WeatherFetcher>) -> BatchFetcher {
        let service = WeatherService::new(
            Arc::new(CacheStore::new()),
            fetcher,
            Arc::new(NoopSink) as Arc<dyn MetricsSink>,
            Duration::from_secs(60),
        );
        BatchFetcher::new(Arc::new(service))
    }

    #[tokio::test]
    async fn test_fatal_cycle_reports_failure() {
        let batch = batch_over(Arc::new(DownFetcher));
        let ok = run_cycle(&batch, &["London".to_string()]).await;

        assert!(!ok);
    }

    #[tokio::test]
    async fn test_successful_cycle_reports_ok() {
        let batch = batch_over(Arc::new(FixedFetcher));
        let ok = run_cycle(&batch, &["London".to_string()]).await;

        assert!(ok);
    }

    #[test]
    fn test_format_record() {
        let record = WeatherRecord {
            city: "London".to_string(),
            temperature: Temperature::from_celsius(12.3),
            conditions: Conditions {
                main: "Clouds".to_string(),
                description: "scattered clouds".to_string(),
            },
            wind: Wind {
                speed: 4.1,
                direction: "NE".to_string(),
            },
            humidity: 81,
            fetched_at: Utc::now(),
        };

        let line = format_record(&record);
        assert!(line.contains("London"));
        assert!(line.contains("12.3°C"));
        assert!(line.contains("54.1°F"));
        assert!(line.contains("Clouds - scattered clouds"));
        assert!(line.contains("Wind: 4.1 m/s NE"));
        assert!(line.contains("Humidity: 81%"));
    }
}
