//! Google Geocoding API client
//!
//! Blocking HTTP client for `/maps/api/geocode/json`. The JSON envelope's
//! `status` field is mapped onto [`GeocodeError`]; the first result wins.

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{GeocodeResult, Geocoder, Precision};
use crate::config::GoogleConfig;
use crate::error::GeocodeError;
use crate::geo::Coordinate;

const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// Geocoder backed by the Google Geocoding API.
///
/// Use [`GoogleGeocoder::from_env`] in applications or
/// [`GoogleGeocoder::new`] with a custom [`GoogleConfig`] to point at a mock
/// server in tests.
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GoogleGeocoder {
    /// Creates a client from explicit settings.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::MissingCredential`] if the API key is blank.
    /// - [`GeocodeError::InvalidRequest`] if the base URL cannot be parsed.
    /// - [`GeocodeError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &GoogleConfig) -> Result<Self, GeocodeError> {
        if config.api_key.trim().is_empty() {
            return Err(GeocodeError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("crmaddr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join(GEOCODE_PATH))
            .map_err(|e| {
                GeocodeError::InvalidRequest(format!("invalid base URL '{}': {e}", config.base_url))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint,
        })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// [`GeocodeError::MissingCredential`] if no usable `GOOGLE_API_KEY` is
    /// set, otherwise the same errors as [`GoogleGeocoder::new`].
    pub fn from_env() -> Result<Self, GeocodeError> {
        let config = GoogleConfig::from_env()?;
        Self::new(&config)
    }

    fn build_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("address", query)
            .append_pair("key", &self.api_key);
        url
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        log::debug!("Geocoding address: {query}");
        let response = self
            .client
            .get(self.build_url(query))
            .send()
            .map_err(|err| {
                // the URL carries the API key
                let err = err.without_url();
                log::warn!("Geocoding request failed: {err}");
                GeocodeError::from(err)
            })?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(GeocodeError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(GeocodeError::InvalidCredential)
            }
            _ => {}
        }

        let body = response.text()?;
        if !status.is_success() {
            log::warn!("Geocoding service answered HTTP {status}");
            return Err(GeocodeError::Api {
                status: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        let envelope: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        let result = interpret(envelope);
        match &result {
            Ok(found) => log::debug!(
                "Geocoded '{query}' to {} ({:?})",
                found.coordinate,
                found.precision
            ),
            Err(err) => log::warn!("Geocoding '{query}' failed: {err}"),
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<ApiResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
    #[serde(default)]
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

fn interpret(response: GeocodeResponse) -> Result<GeocodeResult, GeocodeError> {
    let message = response.error_message.unwrap_or_default();
    match response.status.as_str() {
        "OK" => {
            let first = response
                .results
                .into_iter()
                .next()
                .ok_or(GeocodeError::NotFound)?;
            let Location { lat, lng } = first.geometry.location;
            let coordinate = Coordinate::new(lat, lng)
                .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
            Ok(GeocodeResult {
                formatted_address: first.formatted_address,
                coordinate,
                precision: precision_from(first.geometry.location_type.as_deref()),
            })
        }
        "ZERO_RESULTS" => Err(GeocodeError::NotFound),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(GeocodeError::RateLimited),
        "REQUEST_DENIED" => Err(GeocodeError::InvalidCredential),
        "INVALID_REQUEST" => Err(GeocodeError::InvalidRequest(message)),
        other => Err(GeocodeError::Api {
            status: other.to_string(),
            message,
        }),
    }
}

fn precision_from(location_type: Option<&str>) -> Precision {
    match location_type {
        Some("ROOFTOP") => Precision::Rooftop,
        Some("RANGE_INTERPOLATED") => Precision::RangeInterpolated,
        Some("GEOMETRIC_CENTER") => Precision::GeometricCenter,
        _ => Precision::Approximate,
    }
}
