//! Location resolution and the temple search pipeline.
//!
//! [`Geocoder`] turns a validated [`mandir_core::SearchRequest`] into an
//! origin, [`search_temples`] runs normalize → resolve → rank, and
//! [`SearchSession`] keeps only the newest result when searches overlap.

pub mod error;
pub mod geocoder;
pub mod nominatim;
pub mod pipeline;
pub mod position;
pub mod provider;
pub mod session;

pub use error::GeocodeError;
pub use geocoder::Geocoder;
pub use nominatim::{NominatimClient, NominatimConfig};
pub use pipeline::{search_temples, SearchOutcome};
pub use position::{PositionProvider, ReportedPosition};
pub use provider::{GeocodeQuery, GeocodingProvider};
pub use session::{Completion, SearchSession, SessionState};
