//! Checking an extracted address against a geocoder

use crate::address::ParsedAddress;
use crate::error::GeocodeError;
use crate::geo::{format_distance, Accuracy};
use crate::geocode::{GeocodeResult, Geocoder};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distance between the inline coordinate and the geocoded location
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Comparison {
    pub distance_km: f64,
    pub accuracy: Accuracy,
}

impl Comparison {
    pub fn formatted_distance(&self) -> String {
        format_distance(self.distance_km)
    }
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Verification {
    /// The address as it was passed in
    pub input: ParsedAddress,
    pub geocoded: GeocodeResult,
    /// Present only when the input carried an inline coordinate
    pub comparison: Option<Comparison>,
}

/// Geocodes `address` once and compares the result with its inline
/// coordinate, if any.
///
/// # Errors
///
/// [`GeocodeError::EmptyQuery`] if the address yields no query string;
/// otherwise whatever the geocoder reports, unchanged.
///
/// # Example
///
/// ```
/// use crmaddr::{extract, verify, Coordinate, GeocodeError, GeocodeResult, Geocoder, Precision};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
///         Ok(GeocodeResult {
///             formatted_address: query.to_string(),
///             coordinate: Coordinate::new(40.7128, -74.0060).unwrap(),
///             precision: Precision::Rooftop,
///         })
///     }
/// }
///
/// let addr = extract("350 5th Ave, New York, NY 10118, USA 40.7128,-74.0060");
/// let result = verify(&addr, &Fixed).unwrap();
/// assert_eq!(result.comparison.unwrap().distance_km, 0.0);
/// ```
pub fn verify(
    address: &ParsedAddress,
    geocoder: &dyn Geocoder,
) -> Result<Verification, GeocodeError> {
    let query = address.to_query_string();
    if query.trim().is_empty() {
        return Err(GeocodeError::EmptyQuery);
    }

    let geocoded = geocoder.geocode(&query)?;
    let comparison = address.coordinate().map(|inline| {
        let distance_km = inline.distance_km(&geocoded.coordinate);
        Comparison {
            distance_km,
            accuracy: Accuracy::from_distance_km(distance_km),
        }
    });
    if let Some(c) = &comparison {
        log::debug!(
            "Inline coordinate is {} from geocoded location ({})",
            c.formatted_distance(),
            c.accuracy
        );
    }

    Ok(Verification {
        input: address.clone(),
        geocoded,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::AddressField;
    use crate::geo::Coordinate;
    use crate::geocode::Precision;
    use std::cell::RefCell;

    /// Geocoder returning a canned answer and recording the queries it saw
    struct Stub {
        answer: fn() -> Result<GeocodeResult, GeocodeError>,
        queries: RefCell<Vec<String>>,
    }

    impl Stub {
        fn new(answer: fn() -> Result<GeocodeResult, GeocodeError>) -> Self {
            Self {
                answer,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for Stub {
        fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
            self.queries.borrow_mut().push(query.to_string());
            (self.answer)()
        }
    }

    fn springfield_city_hall() -> Result<GeocodeResult, GeocodeError> {
        Ok(GeocodeResult {
            formatted_address: "123 Main St, Springfield, IL 62704, USA".to_string(),
            coordinate: Coordinate::new(39.7817, -89.6501).unwrap(),
            precision: Precision::Rooftop,
        })
    }

    fn springfield() -> ParsedAddress {
        ParsedAddress::empty()
            .with(AddressField::Street, "123 Main St")
            .with(AddressField::City, "Springfield")
            .with(AddressField::Region, "IL")
            .with(AddressField::PostalCode, "62704")
            .with(AddressField::Country, "USA")
    }

    #[test]
    fn test_verify_without_inline_coordinate() {
        let geocoder = Stub::new(springfield_city_hall);
        let result = verify(&springfield(), &geocoder).unwrap();

        assert_eq!(result.input, springfield());
        assert_eq!(result.geocoded.precision, Precision::Rooftop);
        assert!(result.comparison.is_none());
        assert_eq!(
            geocoder.queries.borrow().as_slice(),
            ["123 Main St, Springfield, IL 62704, USA"]
        );
    }

    #[test]
    fn test_verify_compares_inline_coordinate() {
        let geocoder = Stub::new(springfield_city_hall);
        let addr = springfield().with_coordinate(Coordinate::new(39.7835, -89.6501).ok());
        let comparison = verify(&addr, &geocoder).unwrap().comparison.unwrap();

        // 0.0018 degrees of latitude is roughly 200 m
        assert!((comparison.distance_km - 0.2).abs() < 0.001);
        assert_eq!(comparison.accuracy, Accuracy::Fair);
        assert!(comparison.formatted_distance().ends_with(" m"));
    }

    #[test]
    fn test_verify_empty_address() {
        let geocoder = Stub::new(springfield_city_hall);
        let result = verify(&ParsedAddress::empty(), &geocoder);

        assert!(matches!(result, Err(GeocodeError::EmptyQuery)));
        assert!(geocoder.queries.borrow().is_empty());
    }

    #[test]
    fn test_verify_coordinate_only_is_empty_query() {
        let geocoder = Stub::new(springfield_city_hall);
        let addr = ParsedAddress::empty().with_coordinate(Coordinate::new(1.0, 2.0).ok());
        assert!(matches!(
            verify(&addr, &geocoder),
            Err(GeocodeError::EmptyQuery)
        ));
    }

    #[test]
    fn test_verify_passes_errors_through() {
        let geocoder = Stub::new(|| Err(GeocodeError::RateLimited));
        let addr = springfield();
        let result = verify(&addr, &geocoder);

        assert!(matches!(result, Err(GeocodeError::RateLimited)));
        assert_eq!(geocoder.queries.borrow().len(), 1);
        assert_eq!(addr, springfield());
    }

    #[test]
    fn test_verify_remainder_only() {
        let geocoder = Stub::new(springfield_city_hall);
        let addr = ParsedAddress::empty().with_remainder("near the old mill");
        verify(&addr, &geocoder).unwrap();
        assert_eq!(geocoder.queries.borrow().as_slice(), ["near the old mill"]);
    }
}
