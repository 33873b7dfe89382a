//! Coordinates, distances and accuracy grading

use crate::error::CoordinateError;
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The Earth's radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting values outside the valid ranges.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !is_valid_lat(lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !is_valid_lng(lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Great-circle distance to another coordinate in kilometers
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        distance_km(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Parses `lat,lng` (whitespace around the comma is allowed)
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoordinateError::InvalidFormat(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let lng = lng.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(lat, lng)
    }
}

pub fn is_valid_lat(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub fn is_valid_lng(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}

/// Haversine distance in km
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (dlng / 2.0).sin() * (dlng / 2.0).sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Formats a distance for display: millimeters, meters or kilometers.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 0.001 {
        format!("{:.1} mm", distance_km * 1_000_000.0)
    } else if distance_km < 1.0 {
        format!("{:.1} m", distance_km * 1000.0)
    } else {
        format!("{:.2} km", distance_km)
    }
}

/// How close a CRM coordinate is to the geocoded location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Accuracy {
    /// Less than 10 meters
    Excellent,
    /// Less than 100 meters
    Good,
    /// Less than 1 km
    Fair,
    Poor,
}

impl Accuracy {
    pub fn from_distance_km(distance_km: f64) -> Self {
        if distance_km < 0.01 {
            Self::Excellent
        } else if distance_km < 0.1 {
            Self::Good
        } else if distance_km < 1.0 {
            Self::Fair
        } else {
            // NaN lands here as well
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
