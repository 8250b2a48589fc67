//! Search request types and the query normalizer.
//!
//! A shell sends a [`RawSearchRequest`] with loose optional fields. [`normalize`]
//! turns it into exactly one [`SearchRequest`] variant or rejects it with
//! [`SearchError::InvalidInput`] before anything touches the network.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::distance::Coordinates;

static ZIPCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zipcode regex"));

/// Faults that end a single search attempt.
///
/// Every variant is recoverable by the user: fix the input, fall back to a text
/// search, or retry later.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The named field failed validation (`zipcode`, `coordinates`, `city`, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("location permission denied")]
    LocationPermissionDenied,

    #[error("current location unavailable")]
    LocationUnavailable,

    #[error("no geocoding match for the requested location")]
    GeocodingFailure,

    #[error("geocoding service unreachable: {0}")]
    NetworkError(String),
}

impl SearchError {
    /// Stable machine-readable code for API responses.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::InvalidInput(_) => "invalid_input",
            SearchError::LocationPermissionDenied => "location_permission_denied",
            SearchError::LocationUnavailable => "location_unavailable",
            SearchError::GeocodingFailure => "geocoding_failure",
            SearchError::NetworkError(_) => "network_error",
        }
    }

    /// Message suitable for showing to the person searching.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SearchError::InvalidInput(field) => match field.as_str() {
                "zipcode" => "Please enter a valid 5-digit US zip code".to_string(),
                "coordinates" => "Latitude must be between -90 and 90 and longitude between -180 and 180".to_string(),
                "request" => "Enter exactly one of: zip code, city, state, address, or your current location".to_string(),
                "sort" => "Sort must be one of: distance, name, region".to_string(),
                other => format!("Please enter a {other} to search"),
            },
            SearchError::LocationPermissionDenied => {
                "Location access was denied. Search by zip code instead.".to_string()
            }
            SearchError::LocationUnavailable => {
                "Your current location could not be determined. Search by zip code instead."
                    .to_string()
            }
            SearchError::GeocodingFailure => {
                "Please check your zip code or try using your current location.".to_string()
            }
            SearchError::NetworkError(_) => {
                "The location service is unreachable right now. Please try again.".to_string()
            }
        }
    }
}

/// Why a shell could not supply the device position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionFailure {
    PermissionDenied,
    Unavailable,
}

/// Result ordering for a search.
///
/// Parsed with [`FromStr`], case-insensitively; `state` is accepted for
/// [`SortKey::Region`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Distance,
    Name,
    Region,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Distance => write!(f, "distance"),
            SortKey::Name => write!(f, "name"),
            SortKey::Region => write!(f, "region"),
        }
    }
}

impl FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(SortKey::Distance),
            "name" => Ok(SortKey::Name),
            "region" | "state" => Ok(SortKey::Region),
            _ => Err(SearchError::InvalidInput("sort".to_string())),
        }
    }
}

/// The loose request shape sent by the web and mobile shells.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchRequest {
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub location_error: Option<PositionFailure>,
    /// Kept as text so a bad key is reported as `InvalidInput("sort")`.
    #[serde(default)]
    pub sort: Option<String>,
}

impl RawSearchRequest {
    /// The requested ordering, [`SortKey::Distance`] when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] (`"sort"`) for an unknown key.
    pub fn sort_key(&self) -> Result<SortKey, SearchError> {
        self.sort
            .as_deref()
            .map_or(Ok(SortKey::Distance), SortKey::from_str)
    }
}

/// A validated search request. Exactly one variant per search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Zipcode(String),
    City(String),
    State(String),
    Address(String),
    Coordinates(Coordinates),
    /// The shell asked the device for its position and got nothing back.
    PositionFailed(PositionFailure),
}

impl SearchRequest {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SearchRequest::Zipcode(_) => "zipcode",
            SearchRequest::City(_) => "city",
            SearchRequest::State(_) => "state",
            SearchRequest::Address(_) => "address",
            SearchRequest::Coordinates(_) => "coordinates",
            SearchRequest::PositionFailed(_) => "position",
        }
    }
}

/// True for `12345` and `12345-6789` (surrounding whitespace ignored).
#[must_use]
pub fn is_valid_zipcode(zipcode: &str) -> bool {
    ZIPCODE_RE.is_match(zipcode.trim())
}

/// Validate and classify a raw request.
///
/// # Errors
///
/// Returns [`SearchError::InvalidInput`] naming the offending field,
/// `"request"` when zero or several variants are populated, or `"sort"` for
/// an unknown sort key.
pub fn normalize(raw: &RawSearchRequest) -> Result<SearchRequest, SearchError> {
    let populated = [
        raw.zipcode.is_some(),
        raw.city.is_some(),
        raw.state.is_some(),
        raw.address.is_some(),
        raw.latitude.is_some() || raw.longitude.is_some(),
        raw.location_error.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count();

    if populated != 1 {
        return Err(SearchError::InvalidInput("request".to_string()));
    }
    raw.sort_key()?;

    if let Some(zipcode) = &raw.zipcode {
        let zipcode = zipcode.trim();
        if !is_valid_zipcode(zipcode) {
            return Err(SearchError::InvalidInput("zipcode".to_string()));
        }
        return Ok(SearchRequest::Zipcode(zipcode.to_string()));
    }
    if let Some(city) = &raw.city {
        return non_empty(city, "city").map(SearchRequest::City);
    }
    if let Some(state) = &raw.state {
        return non_empty(state, "state").map(SearchRequest::State);
    }
    if let Some(address) = &raw.address {
        return non_empty(address, "address").map(SearchRequest::Address);
    }
    if let Some(failure) = raw.location_error {
        return Ok(SearchRequest::PositionFailed(failure));
    }

    match (raw.latitude, raw.longitude) {
        (Some(latitude), Some(longitude)) => {
            let coords = Coordinates::new(latitude, longitude);
            if coords.is_valid() {
                Ok(SearchRequest::Coordinates(coords))
            } else {
                Err(SearchError::InvalidInput("coordinates".to_string()))
            }
        }
        _ => Err(SearchError::InvalidInput("coordinates".to_string())),
    }
}

fn non_empty(value: &str, field: &str) -> Result<String, SearchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SearchError::InvalidInput(field.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
