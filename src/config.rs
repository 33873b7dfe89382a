//! Geocoding service configuration

use crate::error::ConfigError;
use std::{env::VarError, fmt, time::Duration};

pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const GOOGLE_BASE_URL_VAR: &str = "GOOGLE_GEOCODING_BASE_URL";
pub const GEOCODING_TIMEOUT_VAR: &str = "GEOCODING_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Value shipped in sample configuration files; treated as "not configured"
const API_KEY_PLACEHOLDER: &str = "YOUR_GOOGLE_MAPS_API_KEY";

/// Settings for the Google geocoding client
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub api_key: String,
    /// Scheme and host, without the API path
    pub base_url: String,
    pub timeout: Duration,
}

impl GoogleConfig {
    /// Configuration with default endpoint and timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key))
    }

    /// Builds the configuration from an env-var lookup function.
    ///
    /// `GOOGLE_API_KEY` is required. An empty key or the sample placeholder
    /// counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let api_key = lookup(GOOGLE_API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != API_KEY_PLACEHOLDER);
        let Some(api_key) = api_key else {
            log::warn!("No Google geocoding API key found");
            return Err(ConfigError::MissingEnvVar(GOOGLE_API_KEY_VAR.to_string()));
        };

        let mut cfg = Self::new(api_key);
        if let Ok(base_url) = lookup(GOOGLE_BASE_URL_VAR) {
            let base_url = base_url.trim().trim_end_matches('/');
            if base_url.is_empty() {
                return Err(ConfigError::InvalidEnvVar {
                    var: GOOGLE_BASE_URL_VAR.to_string(),
                    reason: "empty URL".to_string(),
                });
            }
            cfg.base_url = base_url.to_string();
        }
        if let Ok(secs) = lookup(GEOCODING_TIMEOUT_VAR) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: GEOCODING_TIMEOUT_VAR.to_string(),
                    reason: e.to_string(),
                })?;
            cfg.timeout = Duration::from_secs(secs);
        }
        Ok(cfg)
    }
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn test_defaults() {
        let map = HashMap::from([(GOOGLE_API_KEY_VAR, "test-key")]);
        let cfg = GoogleConfig::from_lookup(lookup_from_map(&map)).unwrap();

        assert_eq!(cfg.api_key, "test-key");
        assert_eq!(cfg.base_url, "https://maps.googleapis.com");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let map = HashMap::from([
            (GOOGLE_API_KEY_VAR, "test-key"),
            (GOOGLE_BASE_URL_VAR, "http://127.0.0.1:8080/"),
            (GEOCODING_TIMEOUT_VAR, "3"),
        ]);
        let cfg = GoogleConfig::from_lookup(lookup_from_map(&map)).unwrap();

        assert_eq!(cfg.base_url, "http://127.0.0.1:8080");
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_missing_key() {
        let map = HashMap::new();
        let result = GoogleConfig::from_lookup(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == GOOGLE_API_KEY_VAR),
            "expected MissingEnvVar(GOOGLE_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn test_placeholder_and_blank_keys_are_missing() {
        for key in [API_KEY_PLACEHOLDER, "", "   "] {
            let map = HashMap::from([(GOOGLE_API_KEY_VAR, key)]);
            assert!(GoogleConfig::from_lookup(lookup_from_map(&map)).is_err());
        }
    }

    #[test]
    fn test_invalid_timeout() {
        let map = HashMap::from([
            (GOOGLE_API_KEY_VAR, "test-key"),
            (GEOCODING_TIMEOUT_VAR, "soon"),
        ]);
        let result = GoogleConfig::from_lookup(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == GEOCODING_TIMEOUT_VAR
        ));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let cfg = GoogleConfig::new("secret-key");
        assert!(!format!("{cfg:?}").contains("secret-key"));
    }
}
