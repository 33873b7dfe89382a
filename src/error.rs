//! Error types

use thiserror::Error;

/// Invalid coordinate input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude outside [-90, 90] or not finite
    #[error("latitude out of range: {0}")]
    Latitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("longitude out of range: {0}")]
    Longitude(f64),

    /// Text is not a `lat,lng` pair
    #[error("invalid coordinate pair: {0}")]
    InvalidFormat(String),
}

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is not set (or empty)
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but cannot be used
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Geocoding failures, as reported to the caller.
///
/// Nothing in this crate retries on any of these.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The service found no match for the query
    #[error("address not found")]
    NotFound,

    /// Rate limit or quota exceeded
    #[error("geocoding quota exceeded or rate limited")]
    RateLimited,

    /// The service rejected the API key
    #[error("geocoding credential rejected")]
    InvalidCredential,

    /// No API key is configured
    #[error("no geocoding credential configured")]
    MissingCredential,

    /// Nothing to geocode
    #[error("empty geocoding query")]
    EmptyQuery,

    /// The service rejected the request itself
    #[error("invalid geocoding request: {0}")]
    InvalidRequest(String),

    /// Any other non-success status reported by the service
    #[error("geocoding failed with status {status}: {message}")]
    Api { status: String, message: String },

    /// The response body could not be interpreted
    #[error("invalid geocoding response: {0}")]
    InvalidResponse(String),

    /// Network or transport failure
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(ConfigError),
}

impl From<ConfigError> for GeocodeError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingEnvVar(ref var) if var == crate::GOOGLE_API_KEY_VAR => {
                Self::MissingCredential
            }
            other => Self::Config(other),
        }
    }
}

#[cfg(feature = "google")]
impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_missing_credential() {
        let err = GeocodeError::from(ConfigError::MissingEnvVar(
            crate::GOOGLE_API_KEY_VAR.to_string(),
        ));
        assert!(matches!(err, GeocodeError::MissingCredential));
    }

    #[test]
    fn test_other_config_errors_pass_through() {
        let err = GeocodeError::from(ConfigError::InvalidEnvVar {
            var: "GEOCODING_TIMEOUT_SECS".to_string(),
            reason: "invalid digit found in string".to_string(),
        });
        assert!(matches!(err, GeocodeError::Config(ConfigError::InvalidEnvVar { .. })));
        assert_eq!(
            err.to_string(),
            "invalid value for GEOCODING_TIMEOUT_SECS: invalid digit found in string"
        );
    }
}
