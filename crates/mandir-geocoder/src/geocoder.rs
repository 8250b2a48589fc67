use mandir_core::{Coordinates, SearchRequest};

use crate::error::GeocodeError;
use crate::position::{PositionProvider, ReportedPosition};
use crate::provider::{GeocodeQuery, GeocodingProvider};

/// Resolves a validated [`SearchRequest`] to the search origin.
///
/// Coordinate requests resolve locally. Every text request makes exactly one
/// provider call.
#[derive(Debug, Clone)]
pub struct Geocoder<P> {
    provider: P,
}

impl<P: GeocodingProvider> Geocoder<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// # Errors
    ///
    /// - [`GeocodeError::NotFound`] when the provider has no match.
    /// - [`GeocodeError::PermissionDenied`] / [`GeocodeError::Unavailable`]
    ///   when the shell could not supply a position.
    /// - Any provider transport or decoding error, unchanged.
    pub async fn resolve(&self, request: &SearchRequest) -> Result<Coordinates, GeocodeError> {
        let query = match request {
            SearchRequest::Coordinates(coords) => {
                return ReportedPosition::At(*coords).current_position().await;
            }
            SearchRequest::PositionFailed(failure) => {
                return ReportedPosition::from(*failure).current_position().await;
            }
            other => GeocodeQuery::from_request(other).ok_or(GeocodeError::NotFound)?,
        };

        self.provider
            .lookup(&query)
            .await?
            .ok_or(GeocodeError::NotFound)
    }
}
