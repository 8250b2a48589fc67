use std::future::Future;

use mandir_core::{Coordinates, PositionFailure};

use crate::error::GeocodeError;

/// Supplies the device's current position.
pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// What a shell reported after asking the device for its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportedPosition {
    At(Coordinates),
    PermissionDenied,
    Unavailable,
}

impl From<PositionFailure> for ReportedPosition {
    fn from(failure: PositionFailure) -> Self {
        match failure {
            PositionFailure::PermissionDenied => Self::PermissionDenied,
            PositionFailure::Unavailable => Self::Unavailable,
        }
    }
}

impl PositionProvider for ReportedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeocodeError> {
        match *self {
            Self::At(coords) => Ok(coords),
            Self::PermissionDenied => Err(GeocodeError::PermissionDenied),
            Self::Unavailable => Err(GeocodeError::Unavailable),
        }
    }
}
