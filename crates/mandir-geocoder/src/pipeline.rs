use mandir_core::{
    normalize, rank, Coordinates, RawSearchRequest, SearchError, SortKey, Temple,
    TempleWithDistance,
};
use serde::Serialize;

use crate::geocoder::Geocoder;
use crate::provider::GeocodingProvider;

/// A completed search: where it was measured from and the ranked temples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub origin: Coordinates,
    pub sort: SortKey,
    pub temples: Vec<TempleWithDistance>,
}

/// Normalize, resolve and rank one search.
///
/// Validation runs before any provider call. Every fault ends this search
/// only.
///
/// # Errors
///
/// Returns the [`SearchError`] for whichever stage failed.
pub async fn search_temples<P: GeocodingProvider>(
    geocoder: &Geocoder<P>,
    temples: &[Temple],
    raw: &RawSearchRequest,
) -> Result<SearchOutcome, SearchError> {
    let request = normalize(raw).inspect_err(|e| {
        tracing::info!(error = %e, "search rejected");
    })?;
    let sort = raw.sort_key()?;

    let origin = geocoder.resolve(&request).await.map_err(|e| {
        tracing::warn!(kind = request.kind(), error = %e, "search origin unresolved");
        SearchError::from(e)
    })?;

    let ranked = rank(origin, temples, sort);
    tracing::info!(
        kind = request.kind(),
        %sort,
        results = ranked.len(),
        "search complete"
    );

    Ok(SearchOutcome {
        origin,
        sort,
        temples: ranked,
    })
}
