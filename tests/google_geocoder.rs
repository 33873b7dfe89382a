//! Integration tests for `GoogleGeocoder` using wiremock HTTP mocks.
#![cfg(feature = "google")]

use crmaddr::{
    extract, verify, Accuracy, GeocodeError, GeocodeResult, Geocoder, GoogleConfig,
    GoogleGeocoder, Precision,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

fn test_config(base_url: &str) -> GoogleConfig {
    let mut config = GoogleConfig::new("test-key");
    config.base_url = base_url.to_string();
    config
}

/// Runs a lookup with the blocking client off the async runtime.
async fn geocode(base_url: String, query: &'static str) -> Result<GeocodeResult, GeocodeError> {
    tokio::task::spawn_blocking(move || {
        let geocoder =
            GoogleGeocoder::new(&test_config(&base_url)).expect("client construction should not fail");
        geocoder.geocode(query)
    })
    .await
    .expect("blocking task should not panic")
}

async fn mount_status(server: &MockServer, status: &str) {
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": status,
            "results": [],
            "error_message": "mocked"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn geocode_returns_first_result() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [{
            "formatted_address": "123 Main St, Springfield, IL 62704, USA",
            "geometry": {
                "location": { "lat": 39.7817, "lng": -89.6501 },
                "location_type": "ROOFTOP"
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "123 Main St, Springfield, IL 62704, USA"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let result = geocode(server.uri(), "123 Main St, Springfield, IL 62704, USA")
        .await
        .expect("should geocode");

    assert_eq!(
        result.formatted_address,
        "123 Main St, Springfield, IL 62704, USA"
    );
    assert_eq!(result.coordinate.lat, 39.7817);
    assert_eq!(result.coordinate.lng, -89.6501);
    assert_eq!(result.precision, Precision::Rooftop);
}

#[tokio::test]
async fn zero_results_is_not_found() {
    let server = MockServer::start().await;
    mount_status(&server, "ZERO_RESULTS").await;

    let result = geocode(server.uri(), "nowhere in particular").await;
    assert!(matches!(result, Err(GeocodeError::NotFound)));
}

#[tokio::test]
async fn over_query_limit_is_rate_limited() {
    let server = MockServer::start().await;
    mount_status(&server, "OVER_QUERY_LIMIT").await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::RateLimited)));
}

#[tokio::test]
async fn request_denied_is_invalid_credential() {
    let server = MockServer::start().await;
    mount_status(&server, "REQUEST_DENIED").await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::InvalidCredential)));
}

#[tokio::test]
async fn http_429_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::RateLimited)));
}

#[tokio::test]
async fn http_403_is_invalid_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::InvalidCredential)));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    match result {
        Err(GeocodeError::Api { status, message }) => {
            assert_eq!(status, "503");
            assert_eq!(message, "unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = geocode(server.uri(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::InvalidResponse(_))));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    // nothing listens on the discard port
    let result = geocode("http://127.0.0.1:9".to_string(), "Springfield, IL").await;
    assert!(matches!(result, Err(GeocodeError::Network(_))));
}

#[tokio::test]
async fn verify_extracted_address_against_mock() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [{
            "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
            "geometry": {
                "location": { "lat": 37.4220, "lng": -122.0841 },
                "location_type": "ROOFTOP"
            }
        }]
    });

    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param(
            "address",
            "1600 Amphitheatre Parkway, Mountain View, CA 94043, USA",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let verification = tokio::task::spawn_blocking(move || {
        let geocoder =
            GoogleGeocoder::new(&test_config(&base_url)).expect("client construction should not fail");
        let addr = extract(
            "Selected address: 1600 Amphitheatre Parkway, Mountain View, CA 94043, USA, latitude: 37.42205, longitude: -122.0841",
        );
        verify(&addr, &geocoder)
    })
    .await
    .expect("blocking task should not panic")
    .expect("should verify");

    let comparison = verification.comparison.expect("comparison");
    assert_eq!(comparison.accuracy, Accuracy::Excellent);
    assert!(comparison.distance_km < 0.01);
}
