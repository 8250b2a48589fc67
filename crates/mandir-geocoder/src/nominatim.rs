//! HTTP client for the Nominatim search API.
//!
//! One `GET /search` per lookup, structured parameters where Nominatim has
//! them (`postalcode`, `city`, `state`) and a free-text `q` otherwise. No
//! retries: the first failure ends the lookup.

use std::time::Duration;

use mandir_core::{AppConfig, Coordinates};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::GeocodeError;
use crate::provider::{GeocodeQuery, GeocodingProvider};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "mandir-locator/0.1 (temple-search)";

/// Connection settings for [`NominatimClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Comma-separated ISO 3166-1 alpha-2 codes, e.g. `us` or `us,ca`.
    pub country_codes: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 10,
            country_codes: "us".to_string(),
        }
    }
}

impl NominatimConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.geocoder_base_url.clone(),
            user_agent: config.geocoder_user_agent.clone(),
            timeout_secs: config.geocoder_timeout_secs,
            country_codes: config.geocoder_country_codes.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Geocoding provider backed by a Nominatim instance.
///
/// Use [`NominatimClient::new`] with settings from the environment or
/// [`NominatimClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    search_url: Url,
    country_codes: String,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if
    /// `config.base_url` is not a valid URL.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(config.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocodeError::InvalidBaseUrl(format!("'{}': {e}", config.base_url)))?;

        Ok(Self {
            client,
            search_url,
            country_codes: config.country_codes.clone(),
        })
    }

    /// Default settings against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`NominatimClient::new`].
    pub fn with_base_url(base_url: &str) -> Result<Self, GeocodeError> {
        Self::new(&NominatimConfig {
            base_url: base_url.to_string(),
            ..NominatimConfig::default()
        })
    }

    fn build_url(&self, query: &GeocodeQuery) -> Url {
        let value = match query {
            // Nominatim indexes 5-digit ZIPs; drop any +4 extension.
            GeocodeQuery::PostalCode(code) => code.split('-').next().unwrap_or(code),
            other => other.value(),
        };

        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("limit", "1");
            pairs.append_pair("countrycodes", &self.country_codes);
            pairs.append_pair(query.kind(), value);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the first
    /// match.
    async fn request_first(&self, url: &Url) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let places: Vec<Place> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        parse_place(url, &place).map(Some)
    }
}

fn parse_place(url: &Url, place: &Place) -> Result<Coordinates, GeocodeError> {
    let invalid = || GeocodeError::InvalidCoordinates {
        context: url.to_string(),
        lat: place.lat.clone(),
        lon: place.lon.clone(),
    };

    let latitude = place.lat.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = place.lon.trim().parse::<f64>().map_err(|_| invalid())?;
    let coords = Coordinates::new(latitude, longitude);

    if coords.is_valid() {
        Ok(coords)
    } else {
        Err(invalid())
    }
}

impl GeocodingProvider for NominatimClient {
    async fn lookup(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.build_url(query);
        tracing::debug!(kind = query.kind(), "nominatim lookup");
        self.request_first(&url).await
    }
}
