//! WeatherClient tests against a mocked forecast service

use helios::api::{FetchError, WeatherClient};
use helios::geo::Coordinate;
use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn forecast_body(hours: usize) -> serde_json::Value {
    let time: Vec<String> = (0..hours)
        .map(|h| format!("2024-06-{:02}T{:02}:00", 1 + h / 24, h % 24))
        .collect();
    let temperature: Vec<f64> = (0..hours).map(|h| 18.0 + h as f64 * 0.25).collect();
    let probability: Vec<Option<u8>> = (0..hours)
        .map(|h| if h % 5 == 0 { None } else { Some(20) })
        .collect();

    serde_json::json!({
        "latitude": 20.0,
        "longitude": 0.0,
        "timezone": "Africa/Algiers",
        "current": {
            "time": "2024-06-01T12:00",
            "temperature_2m": 23.4,
            "relative_humidity_2m": 41,
            "apparent_temperature": 22.8,
            "precipitation": 0.0,
            "weather_code": 1,
            "wind_speed_10m": 12.6
        },
        "hourly": {
            "time": time,
            "temperature_2m": temperature,
            "precipitation_probability": probability
        }
    })
}

fn at(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_sends_forecast_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "20"))
        .and(query_param("longitude", "0"))
        .and(query_param(
            "current",
            "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,weather_code,wind_speed_10m",
        ))
        .and(query_param("hourly", "temperature_2m,precipitation_probability"))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(24)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(mock_server.uri());
    let snapshot = client.fetch(at(20.0, 0.0)).await.unwrap();

    assert_eq!(snapshot.current.temperature, 23.4);
    assert_eq!(snapshot.current.humidity, 41.0);
    assert_eq!(snapshot.current.weather_code, 1);
    assert_eq!(snapshot.current.wind_speed, 12.6);
    assert_eq!(snapshot.hourly.len(), 24);
    assert_eq!(snapshot.hourly[0].precipitation_probability, None);
    assert_eq!(snapshot.hourly[1].precipitation_probability, Some(20.0));
    assert_eq!(snapshot.hourly[23].hour(), Some(23));
}

#[tokio::test]
async fn test_fetch_keeps_unrounded_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(48)))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(format!("{}/", mock_server.uri()));
    let snapshot = client.fetch(at(-33.9, 18.4)).await.unwrap();

    assert_eq!(snapshot.current.apparent_temperature, 22.8);
    // the client does not window; that happens when the chart series is built
    assert_eq!(snapshot.hourly.len(), 48);
    assert_eq!(snapshot.hourly[1].temperature, 18.25);
}

#[tokio::test]
async fn test_server_error_is_status_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(mock_server.uri());
    let err = client.fetch(at(20.0, 0.0)).await.unwrap_err();

    match err {
        FetchError::Status(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_fields_is_schema_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": { "temperature_2m": 23.4 }
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(mock_server.uri());
    let err = client.fetch(at(20.0, 0.0)).await.unwrap_err();

    assert!(matches!(err, FetchError::Schema(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unequal_hourly_lengths_is_schema_failure() {
    let mock_server = MockServer::start().await;

    let mut body = forecast_body(24);
    body["hourly"]["temperature_2m"] = serde_json::json!([1.0, 2.0]);

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(mock_server.uri());
    let err = client.fetch(at(20.0, 0.0)).await.unwrap_err();

    assert!(matches!(err, FetchError::Schema(_)), "got {err:?}");
}

#[tokio::test]
async fn test_non_json_body_is_schema_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::new(mock_server.uri());
    let err = client.fetch(at(20.0, 0.0)).await.unwrap_err();

    assert!(matches!(err, FetchError::Schema(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_service_is_request_failure() {
    // nothing listens on port 1
    let client = WeatherClient::new("http://127.0.0.1:1");
    let err = client.fetch(at(20.0, 0.0)).await.unwrap_err();

    assert!(matches!(err, FetchError::Request(_)), "got {err:?}");
}
