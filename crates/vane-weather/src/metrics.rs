//! Cache and fetch telemetry seam.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use std::time::Duration;

/// One-time metrics registration (so series carry descriptions wherever
/// the host process exports them).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "weather_cache_hits_total",
            "Lookups served from cache without an upstream call."
        );
        describe_counter!(
            "weather_cache_misses_total",
            "Lookups that had to go to the upstream source."
        );
        describe_histogram!("weather_fetch_ms", "Upstream fetch time in milliseconds.");
    });
}

/// Observer for cache effectiveness and fetch timing.
///
/// Calls are fire-and-forget: implementations must not block, and there
/// is no failure channel back to the caller.
pub trait MetricsSink: Send + Sync {
    fn cache_hit(&self, key: &str);
    fn cache_miss(&self, key: &str);
    fn fetch_latency(&self, city: &str, elapsed: Duration);
}

/// Sink backed by the `metrics` facade. Events go to whatever recorder
/// the host process installs; with none installed they are discarded.
pub struct CounterSink;

impl CounterSink {
    pub fn new() -> Self {
        ensure_metrics_described();
        Self
    }
}

impl Default for CounterSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for CounterSink {
    fn cache_hit(&self, key: &str) {
        counter!("weather_cache_hits_total", "key" => key.to_string()).increment(1);
    }

    fn cache_miss(&self, key: &str) {
        counter!("weather_cache_misses_total", "key" => key.to_string()).increment(1);
    }

    fn fetch_latency(&self, city: &str, elapsed: Duration) {
        histogram!("weather_fetch_ms", "city" => city.to_string())
            .record(elapsed.as_secs_f64() * 1000.0);
    }
}

/// Sink that discards every event.
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn cache_hit(&self, _key: &str) {}
    fn cache_miss(&self, _key: &str) {}
    fn fetch_latency(&self, _city: &str, _elapsed: Duration) {}
}

/// Sink that records every event (for assertions in tests).
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub hits: parking_lot::Mutex<Vec<String>>,
    pub misses: parking_lot::Mutex<Vec<String>>,
    pub latencies: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MetricsSink for RecordingSink {
    fn cache_hit(&self, key: &str) {
        self.hits.lock().push(key.to_string());
    }

    fn cache_miss(&self, key: &str) {
        self.misses.lock().push(key.to_string());
    }

    fn fetch_latency(&self, city: &str, _elapsed: Duration) {
        self.latencies.lock().push(city.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_sink_construction_is_repeatable() {
        // Metric descriptions must only register once no matter how many
        // sinks a process builds.
        let _a = CounterSink::new();
        let _b = CounterSink::new();
    }

    #[test]
    fn test_counter_sink_accepts_events_without_a_recorder() {
        let sink = CounterSink::new();
        sink.cache_hit("weather:london");
        sink.cache_miss("weather:london");
        sink.fetch_latency("London", Duration::from_millis(12));
    }

    #[test]
    fn test_recording_sink_captures_keys() {
        let sink = RecordingSink::default();
        sink.cache_hit("weather:london");
        sink.cache_miss("weather:tokyo");
        sink.fetch_latency("Tokyo", Duration::from_millis(5));

        assert_eq!(sink.hits.lock().as_slice(), ["weather:london"]);
        assert_eq!(sink.misses.lock().as_slice(), ["weather:tokyo"]);
        assert_eq!(sink.latencies.lock().as_slice(), ["Tokyo"]);
    }
}
