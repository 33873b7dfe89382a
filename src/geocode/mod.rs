//! Geocoding collaborator seam

use crate::error::GeocodeError;
use crate::geo::Coordinate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "google")]
pub mod google;

/// How precisely the geocoder located the address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Precision {
    /// Exact street address
    Rooftop,
    /// Interpolated between two precise points, e.g. along a street segment
    RangeInterpolated,
    /// Center of a line or area such as a street or a postal code
    GeometricCenter,
    Approximate,
}

/// A resolved location
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeocodeResult {
    /// Address as normalized by the service
    pub formatted_address: String,
    pub coordinate: Coordinate,
    pub precision: Precision,
}

/// Resolves an address query to a location.
///
/// One call is one lookup; implementations must not retry on their own.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError>;
}

impl<G> Geocoder for &G
where
    G: Geocoder + ?Sized,
{
    fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
        (**self).geocode(query)
    }
}

impl<G> Geocoder for Box<G>
where
    G: Geocoder + ?Sized,
{
    fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
        (**self).geocode(query)
    }
}
