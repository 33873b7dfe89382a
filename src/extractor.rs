//! Address extraction from free-form CRM text

use crate::address::ParsedAddress;
use crate::data::{KeywordIndex, STREET_KEYWORDS, STREET_SUFFIXES};
use crate::geo::{is_valid_lat, is_valid_lng, Coordinate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Global extractor instance
static GLOBAL_EXTRACTOR: Lazy<AddressExtractor> = Lazy::new(AddressExtractor::new);

/// Line breaks and semicolons separate segments just like commas
static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:\r?\n|\r|;)\s*").expect("valid regex"));

/// CRM export prefix, e.g. `Selected address: ...`, repeated labels included
static ADDRESS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:selected\s+)?address\s*:\s*)+").expect("valid regex")
});

/// `latitude: 39.78, longitude: -89.65` and the short `lat=` / `lng=` forms
static LABELED_COORDINATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:latitude|lat)\s*[:=]\s*([-+]?\d+(?:\.\d+)?)\s*,?\s*(?:longitude|long|lng|lon)\s*[:=]\s*([-+]?\d+(?:\.\d+)?)",
    )
    .expect("valid regex")
});

/// Two decimal numbers separated by a comma and/or whitespace
static INLINE_COORDINATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w.])([-+]?\d{1,2}\.\d+)(?:\s*,\s*|\s+)([-+]?\d{1,3}\.\d+)")
        .expect("valid regex")
});

/// Postal codes with a distinctive shape: US ZIP / ZIP+4, Canada, UK, Netherlands
static TRAILING_POSTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)(\d{5}(?:-\d{4})?|[A-Z]\d[A-Z] ?\d[A-Z]\d|[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}|\d{4} ?[A-Z]{2})$",
    )
    .expect("valid regex")
});

/// Plain 4-6 digit postal codes
static TRAILING_NUMERIC_POSTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d{4,6})$").expect("valid regex"));

/// `10115 Berlin`, `1012 AB Amsterdam`
static LEADING_POSTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4} ?[A-Z]{2}|\d{4,5})\s+(\D.*)$").expect("valid regex")
});

/// Runs of whitespace, collapsed to one space
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Commas with nothing but whitespace between them
static EMPTY_SEGMENTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*,(?:\s*,)+").expect("valid regex"));

/// Whitespace left in front of a comma
static SPACE_BEFORE_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+,").expect("valid regex"));

/// Address extractor
///
/// Finds an inline coordinate pair, then splits the rest into address fields
/// with comma segmentation and keyword lookups:
///
/// 1. the last segment is the country if it is a known country name or alias
/// 2. a trailing postal-code-shaped token of the last segment is the postal code
/// 3. a trailing state/province code or name is the region
/// 4. of what is left, the last segment is the city and the first
///    street-shaped segment the street
///
/// Anything that does not fit ends up in the remainder. Fields are only
/// assigned when at least one anchor (country, postal code, region or a
/// street-shaped first segment) was recognized.
pub struct AddressExtractor {
    index: KeywordIndex,
}

impl AddressExtractor {
    /// Creates an extractor with the embedded country and region tables
    pub fn new() -> Self {
        Self {
            index: KeywordIndex::embedded(),
        }
    }

    /// Creates an extractor with a custom keyword index
    pub fn with_index(index: KeywordIndex) -> Self {
        Self { index }
    }

    /// Returns the global extractor
    pub fn global() -> &'static AddressExtractor {
        &GLOBAL_EXTRACTOR
    }

    /// Extracts an address and an optional inline coordinate.
    ///
    /// Never fails: empty input gives an empty result and unrecognized text
    /// is kept in [`ParsedAddress::remainder`].
    ///
    /// # Example
    /// ```rust
    /// use crmaddr::AddressExtractor;
    ///
    /// let extractor = AddressExtractor::new();
    /// let result = extractor.extract("123 Main St, Springfield, IL 62704, USA");
    /// assert_eq!(result.postal_code(), Some("62704"));
    /// assert_eq!(result.region(), Some("IL"));
    /// assert_eq!(result.country(), Some("USA"));
    /// ```
    pub fn extract(&self, text: &str) -> ParsedAddress {
        let text = text.trim();
        if text.is_empty() {
            return ParsedAddress::empty();
        }

        let text = SEPARATORS.replace_all(text, ", ");

        let (coordinate, text) = match find_coordinate(&text) {
            Some((coordinate, range)) => {
                log::trace!("Found inline coordinate {coordinate} at {range:?}");
                let cut = format!("{} {}", &text[..range.start], &text[range.end..]);
                (Some(coordinate), cut)
            }
            None => (None, text.into_owned()),
        };

        let text = ADDRESS_LABEL.replace(&text, "");
        let text = tidy(&text);

        let (fields, remainder) = self.segment(&text);
        let result = ParsedAddress::from_parts(fields, coordinate, remainder);
        log::trace!("Extracted {result:?}");
        result
    }

    /// Canonical name of a country name or alias, e.g. `U.S.A.` -> `United States`
    pub fn canonical_country(&self, text: &str) -> Option<&str> {
        self.index.countries.get(text.trim()).map(String::as_str)
    }

    /// Full name of a region code (as written) or region name, e.g. `IL` -> `Illinois`
    pub fn region_name(&self, text: &str) -> Option<&str> {
        let text = text.trim();
        self.index
            .region_codes
            .get(text)
            .or_else(|| self.index.region_names.get(text))
            .map(String::as_str)
    }

    /// Whether the text is a known country name or alias
    pub fn is_known_country(&self, text: &str) -> bool {
        self.canonical_country(text).is_some()
    }

    /// Whether the text is a known region code (as written) or region name
    pub fn is_known_region(&self, text: &str) -> bool {
        self.region_name(text).is_some()
    }

    /// Splits tidied text into [street, city, region, postal code, country]
    /// plus the remainder.
    fn segment(&self, text: &str) -> ([Option<String>; 5], String) {
        let mut segments: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();

        let country = self.take_country(&mut segments);
        let (postal_code, mut city) = take_postal_code(&mut segments);
        let region = if city.is_none() {
            let (region, head) = self.take_region(&mut segments);
            city = head;
            region
        } else {
            None
        };

        let first_is_street = segments.first().is_some_and(|s| looks_like_street(s));
        let anchored = country.is_some()
            || postal_code.is_some()
            || region.is_some()
            || city.is_some()
            || first_is_street;
        if !anchored {
            log::trace!("No address anchor in '{text}'");
            return (Default::default(), text.to_string());
        }

        let mut slots: Vec<Option<String>> = segments.into_iter().map(Some).collect();

        let street_idx = slots
            .iter()
            .position(|s| s.as_deref().is_some_and(starts_with_digit))
            .or_else(|| {
                slots
                    .iter()
                    .position(|s| s.as_deref().is_some_and(looks_like_street))
            });

        if city.is_none() {
            let city_idx = match street_idx {
                Some(si) => (si + 1..slots.len())
                    .rev()
                    .find(|&i| slots[i].as_deref().is_some_and(|s| !looks_like_street(s))),
                None => slots.len().checked_sub(1),
            };
            city = city_idx.and_then(|i| slots[i].take());
        }

        let street = match street_idx {
            Some(i) => slots[i].take(),
            None => slots.iter_mut().find_map(Option::take),
        };

        let remainder = slots.into_iter().flatten().collect::<Vec<_>>().join(", ");

        ([street, city, region, postal_code, country], remainder)
    }

    /// Removes a trailing country from the segments
    fn take_country(&self, segments: &mut Vec<String>) -> Option<String> {
        let last = segments.last()?.clone();
        if self.index.countries.contains(&last) {
            return segments.pop();
        }

        let (_, start) = self.index.country_suffixes.find_longest_suffix(&last)?;
        if start == 0 {
            return None;
        }
        replace_last(segments, last[..start].trim());
        Some(last[start..].trim().to_string())
    }

    /// Removes a trailing region from the last segment.
    ///
    /// Returns the region and, when the segment held more than the region,
    /// the text before it as a city.
    fn take_region(&self, segments: &mut Vec<String>) -> (Option<String>, Option<String>) {
        let only_segment = segments.len() == 1;
        let Some(last) = segments.last().cloned() else {
            return (None, None);
        };
        let Some((region, start)) = self.find_region(&last) else {
            return (None, None);
        };

        let head = last[..start].trim();
        if only_segment && looks_like_street(head) {
            replace_last(segments, head);
            (Some(region), None)
        } else {
            segments.pop();
            (Some(region), (!head.is_empty()).then(|| head.to_string()))
        }
    }

    /// Finds a region at the end of a segment: an exact region code as the
    /// last token, or else a region name.
    fn find_region(&self, segment: &str) -> Option<(String, usize)> {
        let token = segment.split_whitespace().last()?;
        let code = token.trim_end_matches('.');
        if self.index.region_codes.contains_key(code) {
            let start = segment.len() - token.len();
            return Some((code.to_string(), start));
        }

        let (_, start) = self.index.region_names.find_longest_suffix(segment)?;
        Some((segment[start..].to_string(), start))
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes a postal code from the last segment.
///
/// Returns the postal code and, for the `10115 Berlin` form, the city that
/// followed it.
fn take_postal_code(segments: &mut Vec<String>) -> (Option<String>, Option<String>) {
    let only_segment = segments.len() == 1;
    let Some(last) = segments.last().cloned() else {
        return (None, None);
    };

    // a lone street line keeps its numbers
    let allow_numeric = !(only_segment && looks_like_street(&last));
    let trailing = match TRAILING_POSTAL.captures(&last) {
        Some(caps) => Some(caps),
        None if allow_numeric => TRAILING_NUMERIC_POSTAL.captures(&last),
        None => None,
    };
    if let Some(m) = trailing.and_then(|caps| caps.get(1)) {
        replace_last(segments, last[..m.start()].trim());
        return (Some(m.as_str().to_string()), None);
    }

    if only_segment {
        return (None, None);
    }
    let leading = LEADING_POSTAL
        .captures(&last)
        .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim())))
        .filter(|(_, city)| !looks_like_street(city));
    match leading {
        Some((postal_code, city)) => {
            segments.pop();
            (Some(postal_code.to_string()), Some(city.to_string()))
        }
        None => (None, None),
    }
}

/// Replaces the last segment, dropping it when nothing is left
fn replace_last(segments: &mut Vec<String>, head: &str) {
    if head.is_empty() {
        segments.pop();
    } else if let Some(last) = segments.last_mut() {
        *last = head.to_string();
    }
}

/// Finds the first plausible coordinate pair: labeled pairs first, then bare
/// decimal pairs. Returns the coordinate and the byte range to cut out.
fn find_coordinate(text: &str) -> Option<(Coordinate, Range<usize>)> {
    for caps in LABELED_COORDINATE.captures_iter(text) {
        let (Some(whole), Some(lat), Some(lng)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        if let Some(coordinate) = parse_pair(lat.as_str(), lng.as_str()) {
            return Some((coordinate, whole.range()));
        }
    }

    // a rejected candidate's longitude may start the next valid pair
    let mut start = 0;
    while let Some(caps) = INLINE_COORDINATE.captures_at(text, start) {
        let (Some(lat), Some(lng)) = (caps.get(1), caps.get(2)) else {
            break;
        };
        start = lat.end();
        if glued_to_next_word(&text[lng.end()..]) {
            continue;
        }
        if let Some(coordinate) = parse_pair(lat.as_str(), lng.as_str()) {
            return Some((coordinate, lat.start()..lng.end()));
        }
    }

    None
}

fn parse_pair(lat: &str, lng: &str) -> Option<Coordinate> {
    let lat = lat.parse::<f64>().ok()?;
    let lng = lng.parse::<f64>().ok()?;
    if is_valid_lat(lat) && is_valid_lng(lng) {
        Some(Coordinate { lat, lng })
    } else {
        None
    }
}

/// `74.0060abc` or `74.0060.5` are not coordinates
fn glued_to_next_word(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_alphanumeric() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn starts_with_digit(segment: &str) -> bool {
    segment.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Starts with a house number or contains a street keyword
fn looks_like_street(segment: &str) -> bool {
    if starts_with_digit(segment) {
        return true;
    }
    segment.split_whitespace().any(|token| {
        let token = token.trim_end_matches(['.', ',']).to_lowercase();
        STREET_KEYWORDS.contains(&token.as_str())
            || STREET_SUFFIXES.iter().any(|suffix| {
                token.ends_with(suffix) && token.chars().count() > suffix.chars().count() + 2
            })
    })
}

/// Collapses whitespace and drops empty comma segments
fn tidy(text: &str) -> String {
    let text = WHITESPACE.replace_all(text, " ");
    let text = EMPTY_SEGMENTS.replace_all(&text, ",");
    let text = SPACE_BEFORE_COMMA.replace_all(&text, ",");
    text.trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}
