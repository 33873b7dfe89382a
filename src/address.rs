//! Extraction result

use crate::geo::Coordinate;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structured address fields of a [`ParsedAddress`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressField {
    Street,
    City,
    /// State, province or similar first-level division
    Region,
    PostalCode,
    Country,
}

impl AddressField {
    pub const ALL: [AddressField; 5] = [
        AddressField::Street,
        AddressField::City,
        AddressField::Region,
        AddressField::PostalCode,
        AddressField::Country,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::City => "city",
            Self::Region => "region",
            Self::PostalCode => "postal code",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Address extracted from free-form CRM text.
///
/// A value never changes after it was produced. Corrections go through
/// [`with`](Self::with) and friends, which return a new value and leave the
/// original extraction available for comparison.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedAddress {
    street: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    /// Inline coordinate found in the text
    coordinate: Option<Coordinate>,
    /// Text that could not be assigned to any field
    remainder: String,
}

impl ParsedAddress {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        fields: [Option<String>; 5],
        coordinate: Option<Coordinate>,
        remainder: String,
    ) -> Self {
        let [street, city, region, postal_code, country] = fields;
        Self {
            street,
            city,
            region,
            postal_code,
            country,
            coordinate,
            remainder,
        }
    }

    pub fn street(&self) -> Option<&str> {
        self.street.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Free-text fallback; empty when everything was assigned
    pub fn remainder(&self) -> &str {
        &self.remainder
    }

    /// Value of a structured field
    pub fn get(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::Street => self.street(),
            AddressField::City => self.city(),
            AddressField::Region => self.region(),
            AddressField::PostalCode => self.postal_code(),
            AddressField::Country => self.country(),
        }
    }

    fn slot_mut(&mut self, field: AddressField) -> &mut Option<String> {
        match field {
            AddressField::Street => &mut self.street,
            AddressField::City => &mut self.city,
            AddressField::Region => &mut self.region,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::Country => &mut self.country,
        }
    }

    /// Returns a copy with `field` set to `value`.
    ///
    /// The value is trimmed; a blank value clears the field.
    #[must_use]
    pub fn with(&self, field: AddressField, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = value.trim();
        let mut edited = self.clone();
        *edited.slot_mut(field) = (!value.is_empty()).then(|| value.to_string());
        edited
    }

    /// Returns a copy with `field` cleared
    #[must_use]
    pub fn without(&self, field: AddressField) -> Self {
        let mut edited = self.clone();
        *edited.slot_mut(field) = None;
        edited
    }

    /// Returns a copy with the inline coordinate replaced
    #[must_use]
    pub fn with_coordinate(&self, coordinate: Option<Coordinate>) -> Self {
        Self {
            coordinate,
            ..self.clone()
        }
    }

    /// Returns a copy with the free-text remainder replaced
    #[must_use]
    pub fn with_remainder(&self, remainder: impl Into<String>) -> Self {
        Self {
            remainder: remainder.into().trim().to_string(),
            ..self.clone()
        }
    }

    /// No field, no coordinate and no remainder
    pub fn is_empty(&self) -> bool {
        !self.has_structure() && self.coordinate.is_none() && self.remainder.is_empty()
    }

    /// At least one structured field is set
    pub fn has_structure(&self) -> bool {
        AddressField::ALL.iter().any(|f| self.get(*f).is_some())
    }

    pub fn has_coordinate(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Fields that could not be determined
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// Query string for a geocoding lookup.
    ///
    /// `street, city, region postal, country` with unset parts left out.
    /// Falls back to the remainder when no structured field is set.
    /// The inline coordinate is never part of the query.
    pub fn to_query_string(&self) -> String {
        if !self.has_structure() {
            return self.remainder.clone();
        }

        let region_postal = [self.region(), self.postal_code()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        [
            self.street(),
            self.city(),
            (!region_postal.is_empty()).then_some(region_postal.as_str()),
            self.country(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }
}
