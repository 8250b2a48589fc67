use std::future::Future;

use mandir_core::{Coordinates, SearchRequest};

use crate::error::GeocodeError;

/// A text query for an external geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeQuery {
    PostalCode(String),
    City(String),
    State(String),
    FreeText(String),
}

impl GeocodeQuery {
    /// The provider query for a request, or `None` for requests that carry
    /// their own position.
    #[must_use]
    pub fn from_request(request: &SearchRequest) -> Option<Self> {
        match request {
            SearchRequest::Zipcode(zip) => Some(Self::PostalCode(zip.clone())),
            SearchRequest::City(city) => Some(Self::City(city.clone())),
            SearchRequest::State(state) => Some(Self::State(state.clone())),
            SearchRequest::Address(address) => Some(Self::FreeText(address.clone())),
            SearchRequest::Coordinates(_) | SearchRequest::PositionFailed(_) => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PostalCode(_) => "postalcode",
            Self::City(_) => "city",
            Self::State(_) => "state",
            Self::FreeText(_) => "q",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::PostalCode(v) | Self::City(v) | Self::State(v) | Self::FreeText(v) => v,
        }
    }
}

/// Resolves text queries to coordinates.
///
/// `Ok(None)` means the service answered with no match.
pub trait GeocodingProvider: Send + Sync {
    fn lookup(
        &self,
        query: &GeocodeQuery,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}
