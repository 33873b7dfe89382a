//! Embedded country and region tables and the keyword index built from them

use crate::trie::KeywordTrie;
use std::collections::HashMap;

/// Country names and aliases (compiled in)
const COUNTRY_DATA: &str = include_str!("../data/countries.csv");

/// US states, Canadian provinces and Australian states (compiled in)
const REGION_DATA: &str = include_str!("../data/regions.csv");

/// Street type words matched as whole tokens (lowercase, trailing dot removed)
pub const STREET_KEYWORDS: &[&str] = &[
    "st", "street", "ave", "av", "avenue", "rd", "road", "blvd", "boulevard", "ln", "lane",
    "dr", "drive", "way", "ct", "court", "pl", "place", "pkwy", "parkway", "hwy", "highway",
    "sq", "square", "ter", "terrace", "cir", "circle", "suite", "ste", "apt", "unit", "floor",
    "rue", "via", "calle", "avenida", "box",
];

/// Street suffixes of compound street names (`Hauptstraße`, `Lindenweg`)
pub const STREET_SUFFIXES: &[&str] = &[
    "straße", "strasse", "str", "weg", "gasse", "allee", "platz", "laan",
];

/// A country with its canonical name and accepted aliases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    pub aliases: Vec<String>,
}

/// A first-level administrative region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// Loads the embedded country table
pub fn load_countries() -> Vec<Country> {
    COUNTRY_DATA
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (name, aliases) = line.split_once(',').unwrap_or((line, ""));
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let aliases = aliases
                .split('|')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(ToString::to_string)
                .collect();
            Some(Country {
                name: name.to_string(),
                aliases,
            })
        })
        .collect()
}

/// Loads the embedded region table
pub fn load_regions() -> Vec<Region> {
    REGION_DATA
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (code, name) = line.split_once(',')?;
            let (code, name) = (code.trim(), name.trim());
            if code.is_empty() || name.is_empty() {
                return None;
            }
            Some(Region {
                code: code.to_string(),
                name: name.to_string(),
            })
        })
        .collect()
}

/// Lookup structures used by the extractor
pub struct KeywordIndex {
    /// Every country name and alias -> canonical name
    pub countries: KeywordTrie<String>,
    /// Only keywords safe to split off the end of a segment without a comma:
    /// full names and all-letter aliases of at least three characters
    pub country_suffixes: KeywordTrie<String>,
    /// Region names (case-insensitive)
    pub region_names: KeywordTrie<String>,
    /// Region codes, matched case-sensitively as written
    pub region_codes: HashMap<String, String>,
}

impl KeywordIndex {
    /// Builds the index from the country and region tables
    pub fn build(countries: &[Country], regions: &[Region]) -> Self {
        let mut country_trie = KeywordTrie::new();
        let mut country_suffixes = KeywordTrie::new();
        for country in countries {
            country_trie.insert(&country.name, country.name.clone());
            country_suffixes.insert(&country.name, country.name.clone());
            for alias in &country.aliases {
                country_trie.insert(alias, country.name.clone());
                if alias.chars().filter(|c| c.is_alphabetic()).count() >= 3
                    && alias.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '\'')
                {
                    country_suffixes.insert(alias, country.name.clone());
                }
            }
        }

        let mut region_names = KeywordTrie::new();
        let mut region_codes = HashMap::new();
        for region in regions {
            region_names.insert(&region.name, region.name.clone());
            region_codes.insert(region.code.clone(), region.name.clone());
        }

        Self {
            countries: country_trie,
            country_suffixes,
            region_names,
            region_codes,
        }
    }

    /// Builds the index from the embedded tables
    pub fn embedded() -> Self {
        Self::build(&load_countries(), &load_regions())
    }
}
