//! Google Maps links for display

use crate::geo::Coordinate;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

const EMBED_BASE: &str = "https://maps.google.com/maps";
const SEARCH_BASE: &str = "https://www.google.com/maps/search/";
const EMBED_ZOOM: u8 = 15;

/// Embeddable map centered on a coordinate
pub fn embed_url_for_coordinate(coordinate: &Coordinate) -> String {
    format!(
        "{EMBED_BASE}?q={},{}&z={EMBED_ZOOM}&output=embed",
        coordinate.lat, coordinate.lng
    )
}

/// Embeddable map searching for an address
pub fn embed_url_for_address(address: &str) -> String {
    format!(
        "{EMBED_BASE}?q={}&z={EMBED_ZOOM}&output=embed",
        encode_address(address)
    )
}

/// Public Google Maps search link for an address
pub fn search_url_for_address(address: &str) -> String {
    format!("{SEARCH_BASE}?api=1&query={}", encode_address(address))
}

fn encode_address(address: &str) -> String {
    let flat = address.trim().replace(['\r', '\n'], " ");
    utf8_percent_encode(&flat, NON_ALPHANUMERIC).to_string()
}
