//! Distance ranker: attach a distance to each temple and order the list.

use std::cmp::Ordering;

use crate::distance::{haversine_miles, Coordinates};
use crate::search::SortKey;
use crate::{Temple, TempleWithDistance};

/// Rank `temples` against `origin`.
///
/// Temples without stored coordinates are skipped. Every returned distance is
/// measured from the same `origin` with [`haversine_miles`]. Ties fall back to
/// ascending `id`, so the ordering is total and repeatable.
#[must_use]
pub fn rank(origin: Coordinates, temples: &[Temple], sort: SortKey) -> Vec<TempleWithDistance> {
    let mut ranked: Vec<TempleWithDistance> = temples
        .iter()
        .filter_map(|temple| {
            let at = temple.coordinates()?;
            Some(TempleWithDistance {
                temple: temple.clone(),
                distance: haversine_miles(&origin, &at),
            })
        })
        .collect();

    match sort {
        SortKey::Distance => ranked.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.temple.id.cmp(&b.temple.id))
        }),
        SortKey::Name => ranked.sort_by(|a, b| {
            fold(&a.temple.city)
                .cmp(&fold(&b.temple.city))
                .then(a.temple.id.cmp(&b.temple.id))
        }),
        SortKey::Region => ranked.sort_by(|a, b| {
            compare_region(a.temple.region.as_deref(), b.temple.region.as_deref())
                .then(a.temple.id.cmp(&b.temple.id))
        }),
    }

    ranked
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

// Missing regions sort last.
fn compare_region(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => fold(a).cmp(&fold(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
