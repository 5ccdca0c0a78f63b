//! Integration tests for the weather and location services using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use leafcare_core::{LocationConfig, Source, WeatherConfig};
use leafcare_weather::{LocationService, OpenWeatherProvider, WeatherService};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_config(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        timeout_secs: 1,
        refresh_minutes: 15,
        forecast_days: 1,
    }
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "main": {"temp": 36.6, "feels_like": 39.2, "humidity": 40},
        "weather": [{"main": "Clear", "description": "clear sky", "icon": "01d"}],
        "clouds": {"all": 5},
        "wind": {"speed": 2.5},
        "sys": {"country": "PK", "sunrise": 1717200000, "sunset": 1717250400},
        "name": "Sialkot"
    })
}

fn forecast_body(steps: usize) -> serde_json::Value {
    let list: Vec<_> = (0..steps)
        .map(|i| {
            let rainy = i == 2;
            let mut item = serde_json::json!({
                "dt": 1717210800 + (i as i64) * 10800,
                "main": {"temp": 30.0, "humidity": 50},
                "weather": [{
                    "main": if rainy { "Rain" } else { "Clear" },
                    "description": if rainy { "moderate rain" } else { "clear sky" }
                }],
                "clouds": {"all": if rainy { 90 } else { 0 }}
            });
            if rainy {
                item["rain"] = serde_json::json!({"3h": 3.2});
            }
            item
        })
        .collect();
    serde_json::json!({ "list": list })
}

#[tokio::test]
async fn test_current_weather_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Sialkot,PK"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&weather_config(&server)).unwrap();
    let weather = provider.current("Sialkot", "PK").await.unwrap();

    assert_eq!(weather.temperature, 37.0);
    assert_eq!(weather.feels_like, 39.0);
    assert_eq!(weather.cloud_cover, 5);
    assert_eq!(weather.condition, "Clear");
    assert_eq!(weather.city, "Sialkot");
    assert_eq!(weather.sunrise, Utc.timestamp_opt(1717200000, 0).unwrap());
}

#[tokio::test]
async fn test_forecast_truncated_to_requested_days() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&weather_config(&server)).unwrap();
    let forecast = provider.forecast("Sialkot", "PK", 2).await.unwrap();

    assert_eq!(forecast.len(), 16);
    assert_eq!(forecast[0].precipitation, 0.0);
    assert_eq!(forecast[2].precipitation, 3.2);
    assert_eq!(forecast[2].description, "moderate rain");
}

#[tokio::test]
async fn test_rejected_key_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&weather_config(&server)).unwrap();
    let err = provider.current("Sialkot", "PK").await.unwrap_err();
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_report_uses_live_data() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(8)))
        .mount(&server)
        .await;

    let service = WeatherService::new(&weather_config(&server)).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let report = service.report("Sialkot", "PK", now).await;

    assert!(!report.uses_fallback());
    assert_eq!(report.current_source, Source::Provider("openweathermap".into()));
    assert_eq!(report.current.temperature, 37.0);
    assert_eq!(report.forecast.len(), 8);
}

#[tokio::test]
async fn test_report_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = WeatherService::new(&weather_config(&server)).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let report = service.report("Sialkot", "PK", now).await;

    assert!(report.uses_fallback());
    assert_eq!(report.current_source, Source::Fallback);
    assert_eq!(report.current.temperature, 32.0);
    assert_eq!(report.current.city, "Sialkot");
    assert_eq!(report.forecast.len(), 8);
    assert_eq!(report.forecast[4].precipitation, 2.5);
}

#[tokio::test]
async fn test_report_falls_back_on_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let service = WeatherService::new(&weather_config(&server)).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let report = service.report("Sialkot", "PK", now).await;

    assert_eq!(report.current_source, Source::Fallback);
}

#[tokio::test]
async fn test_report_without_key_never_calls_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&server)
        .await;

    let config = WeatherConfig {
        api_key: String::new(),
        ..weather_config(&server)
    };
    let service = WeatherService::new(&config).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let report = service.report("Sialkot", "PK", now).await;

    assert_eq!(report.current_source, Source::Fallback);
    assert_eq!(report.forecast_source, Source::Fallback);
}

#[tokio::test]
async fn test_report_cached_within_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(8)))
        .expect(1)
        .mount(&server)
        .await;

    let service = WeatherService::new(&weather_config(&server)).unwrap();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let first = service.report("Sialkot", "PK", now).await;
    let second = service
        .report("Sialkot", "PK", now + chrono::Duration::minutes(5))
        .await;

    assert_eq!(first.current, second.current);
}

fn location_config(urls: Vec<String>) -> LocationConfig {
    LocationConfig {
        providers: urls,
        timeout_secs: 1,
        ..LocationConfig::default()
    }
}

#[tokio::test]
async fn test_location_second_provider_used_when_first_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary/json/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/secondary/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "country": "Pakistan",
            "countryCode": "PK",
            "regionName": "Punjab",
            "city": "Lahore",
            "lat": 31.55,
            "lon": 74.34
        })))
        .mount(&server)
        .await;

    let service = LocationService::new(&location_config(vec![
        format!("{}/primary/json/", server.uri()),
        format!("{}/secondary/json/", server.uri()),
    ]))
    .unwrap();

    let resolved = service.detect().await;
    assert!(!resolved.is_fallback());
    assert_eq!(resolved.value.city, "Lahore");
    assert_eq!(resolved.value.country_code, "PK");
}

#[tokio::test]
async fn test_location_without_city_falls_back_to_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "country_name": "Pakistan",
            "country_code": "PK"
        })))
        .mount(&server)
        .await;

    let service =
        LocationService::new(&location_config(vec![format!("{}/json/", server.uri())])).unwrap();

    let resolved = service.detect().await;
    assert!(resolved.is_fallback());
    assert_eq!(resolved.value.city, "Sialkot");
    assert_eq!(resolved.value.country_code, "PK");
}

#[tokio::test]
#[ignore] // Run with: cargo test -p leafcare-weather -- --ignored
async fn test_live_ip_geolocation() {
    let service = LocationService::new(&LocationConfig::default()).unwrap();
    let resolved = service.detect().await;
    assert!(!resolved.value.city.is_empty());
}
