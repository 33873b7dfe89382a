//! # crmaddr - CRM address extraction
//!
//! Turns the free-form address text found in CRM records into a structured
//! [`ParsedAddress`], builds a geocoding query from it and checks the result
//! against a geocoding service.
//!
//! ## Features
//!
//! - Street, city, region, postal code and country from comma separated text
//! - Inline coordinate pairs (`40.7128,-74.0060`, `latitude: .., longitude: ..`)
//! - Free-text remainder for everything that could not be assigned
//! - Built-in country names/aliases and US/CA/AU region codes
//! - [`Geocoder`] seam with a Google Geocoding implementation (`google` feature)
//! - Distance and accuracy grading between CRM and geocoded coordinates
//! - Google Maps embed and search links
//!
//! ## Quick start
//!
//! ```rust
//! use crmaddr::{extract, AddressField};
//!
//! let result = extract("123 Main St, Springfield, IL 62704, USA");
//! assert_eq!(result.street(), Some("123 Main St"));
//! assert_eq!(result.city(), Some("Springfield"));
//! assert_eq!(result.region(), Some("IL"));
//! assert_eq!(result.postal_code(), Some("62704"));
//! assert_eq!(result.country(), Some("USA"));
//!
//! // inline coordinates are picked up and kept out of the query
//! let result = extract("embedded note 40.7128,-74.0060 rest of text");
//! let c = result.coordinate().unwrap();
//! assert_eq!((c.lat, c.lng), (40.7128, -74.0060));
//!
//! // corrections produce a new value
//! let fixed = result.with(AddressField::City, "New York");
//! assert_eq!(fixed.city(), Some("New York"));
//! assert_eq!(result.city(), None);
//! ```

mod address;
mod config;
mod data;
mod error;
mod extractor;
mod geo;
mod geocode;
mod maps;
mod trie;
mod verify;

pub use address::{AddressField, ParsedAddress};
pub use config::{GoogleConfig, GEOCODING_TIMEOUT_VAR, GOOGLE_API_KEY_VAR, GOOGLE_BASE_URL_VAR};
pub use data::{Country, KeywordIndex, Region};
pub use error::{ConfigError, CoordinateError, GeocodeError};
pub use extractor::AddressExtractor;
pub use geo::{distance_km, format_distance, Accuracy, Coordinate};
pub use geocode::{GeocodeResult, Geocoder, Precision};
pub use maps::{embed_url_for_address, embed_url_for_coordinate, search_url_for_address};
pub use verify::{verify, Comparison, Verification};

#[cfg(feature = "google")]
pub use geocode::google::GoogleGeocoder;

/// Extracts an address with the global extractor
///
/// ```rust
/// let result = crmaddr::extract("Unter den Linden 77, 10117 Berlin, Germany");
/// assert_eq!(result.postal_code(), Some("10117"));
/// assert_eq!(result.city(), Some("Berlin"));
/// assert_eq!(result.country(), Some("Germany"));
/// ```
pub fn extract(text: &str) -> ParsedAddress {
    AddressExtractor::global().extract(text)
}

/// Builds the geocoding query for free-form text
///
/// ```rust
/// let query = crmaddr::query_string("123 Main St\nSpringfield, IL 62704\nUSA");
/// assert_eq!(query, "123 Main St, Springfield, IL 62704, USA");
/// ```
pub fn query_string(text: &str) -> String {
    extract(text).to_query_string()
}
