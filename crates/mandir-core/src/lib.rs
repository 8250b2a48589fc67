pub mod app_config;
pub mod config;
pub mod distance;
pub mod rank;
pub mod search;
pub mod temples;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{haversine_miles, Coordinates, EARTH_RADIUS_MILES};
pub use rank::rank;
pub use search::{
    is_valid_zipcode, normalize, PositionFailure, RawSearchRequest, SearchError, SearchRequest,
    SortKey,
};
pub use temples::{load_temples, TempleConfig, TemplesFile};

/// A temple reference record. Read-only for the search pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temple {
    pub id: i64,
    pub city: String,
    pub address: String,
    /// State or province code, populated when the record is entered.
    pub region: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub operating_hours: Option<String>,
    pub operating_days: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Temple {
    /// Stored coordinates, if both halves are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// A temple with its great-circle distance (miles) from the search origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempleWithDistance {
    #[serde(flatten)]
    pub temple: Temple,
    pub distance: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read temples file {path}: {source}")]
    TemplesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse temples file: {0}")]
    TemplesFileParse(#[from] serde_yaml::Error),

    #[error("temples file validation failed: {0}")]
    Validation(String),
}
