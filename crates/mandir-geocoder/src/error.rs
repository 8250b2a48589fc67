use mandir_core::SearchError;
use thiserror::Error;

/// Errors returned while resolving a search request to coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider answered but had no match for the query.
    #[error("no match for query")]
    NotFound,

    /// The device refused to share its position.
    #[error("position permission denied")]
    PermissionDenied,

    /// The device could not determine its position.
    #[error("position unavailable")]
    Unavailable,

    /// Network or TLS failure, timeout, or a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A match came back with coordinates that do not parse or are out of range.
    #[error("invalid coordinates from {context}: lat={lat:?} lon={lon:?}")]
    InvalidCoordinates {
        context: String,
        lat: String,
        lon: String,
    },

    #[error("invalid geocoder base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<GeocodeError> for SearchError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotFound => SearchError::GeocodingFailure,
            GeocodeError::PermissionDenied => SearchError::LocationPermissionDenied,
            GeocodeError::Unavailable => SearchError::LocationUnavailable,
            other => SearchError::NetworkError(other.to_string()),
        }
    }
}
