//! End-to-end batch cycle against a mock upstream.
//!
//! Drives the full client -> service -> batch -> stats path and checks
//! that caching and partial-failure behavior hold across cycles.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use vane_weather::{
    temperature_extremes, BatchFetcher, CacheStore, MetricsSink, NoopSink, OpenWeatherClient,
    WeatherError, WeatherFetcher, WeatherService,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn city_payload(name: &str, kelvin: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "main": { "temp": kelvin, "humidity": 60 },
        "weather": [ { "main": "Clear", "description": "clear sky" } ],
        "wind": { "speed": 2.5, "deg": 180 }
    })
}

async fn mount_city(server: &MockServer, query: &str, name: &str, kelvin: f64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(city_payload(name, kelvin)))
        .mount(server)
        .await;
}

async fn mount_failure(server: &MockServer, query: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

fn batch_against(server: &MockServer) -> BatchFetcher {
    let client = OpenWeatherClient::with_base_url("test-key", &server.uri());
    let service = WeatherService::new(
        Arc::new(CacheStore::new()),
        Arc::new(client) as Arc<dyn WeatherFetcher>,
        Arc::new(NoopSink) as Arc<dyn MetricsSink>,
        Duration::from_secs(60),
    );
    BatchFetcher::new(Arc::new(service))
}

fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_partial_cycle_with_stats() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "London", "London", 285.15).await; // 12 C
    mount_city(&mock_server, "Tokyo", "Tokyo", 303.15).await; // 30 C
    mount_failure(&mock_server, "Osaka").await;

    let batch = batch_against(&mock_server);
    let result = batch.fetch_all(&cities(&["London", "Tokyo", "Osaka"])).await.unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.failed, vec!["Osaka".to_string()]);
    assert!(result.is_partial());

    let extremes = temperature_extremes(&result.records).unwrap();
    assert_eq!(extremes.hottest.city, "Tokyo");
    assert_eq!(extremes.coldest.city, "London");
}

#[tokio::test]
async fn test_second_cycle_hits_cache_but_retries_failures() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "London", "London", 285.15).await;
    mount_city(&mock_server, "Tokyo", "Tokyo", 303.15).await;
    mount_failure(&mock_server, "Osaka").await;

    let batch = batch_against(&mock_server);
    let all = cities(&["London", "Tokyo", "Osaka"]);

    batch.fetch_all(&all).await.unwrap();
    let requests_after_first = mock_server.received_requests().await.unwrap().len();
    assert_eq!(requests_after_first, 3);

    let second = batch.fetch_all(&all).await.unwrap();
    assert_eq!(second.records.len(), 2);
    assert_eq!(second.failed, vec!["Osaka".to_string()]);

    // London and Tokyo came from cache; only the failed city went
    // upstream again.
    let requests_after_second = mock_server.received_requests().await.unwrap().len();
    assert_eq!(requests_after_second, 4);
}

#[tokio::test]
async fn test_every_city_down_is_fatal() {
    let mock_server = MockServer::start().await;
    mount_failure(&mock_server, "London").await;
    mount_failure(&mock_server, "Tokyo").await;

    let batch = batch_against(&mock_server);
    let result = batch.fetch_all(&cities(&["London", "Tokyo"])).await;

    assert!(matches!(result, Err(WeatherError::AllSourcesUnavailable)));
}
