use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::Coordinates;
use crate::{ConfigError, Temple};

/// One temple entry in `config/temples.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TempleConfig {
    pub id: i64,
    pub city: String,
    pub address: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub operating_days: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl TempleConfig {
    /// The explicit `region`, or a two-letter code taken from the address.
    ///
    /// Segments are scanned from the end so both `"Robbinsville, NJ 08691"`
    /// and `"Robbinsville, NJ, 08691"` yield `NJ`.
    #[must_use]
    pub fn resolved_region(&self) -> Option<String> {
        if let Some(region) = &self.region {
            return Some(region.trim().to_string());
        }

        self.address.rsplit(',').find_map(|segment| {
            let token = segment.split_whitespace().next()?;
            (token.len() == 2 && token.chars().all(|c| c.is_ascii_alphabetic()))
                .then(|| token.to_ascii_uppercase())
        })
    }

    /// Convert to the core record, filling the region from the address.
    #[must_use]
    pub fn to_temple(&self) -> Temple {
        Temple {
            id: self.id,
            city: self.city.trim().to_string(),
            address: self.address.trim().to_string(),
            region: self.resolved_region(),
            phone: self.phone.clone(),
            fax: self.fax.clone(),
            email: self.email.clone(),
            operating_hours: self.operating_hours.clone(),
            operating_days: self.operating_days.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplesFile {
    pub temples: Vec<TempleConfig>,
}

impl TemplesFile {
    /// All entries as core [`Temple`] records, in file order.
    #[must_use]
    pub fn to_temples(&self) -> Vec<Temple> {
        self.temples.iter().map(TempleConfig::to_temple).collect()
    }
}

/// Load and validate temple reference data from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_temples(path: &Path) -> Result<TemplesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TemplesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let temples_file: TemplesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::TemplesFileParse)?;

    validate_temples(&temples_file)?;

    Ok(temples_file)
}

fn validate_temples(temples_file: &TemplesFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for temple in &temples_file.temples {
        if temple.id <= 0 {
            return Err(ConfigError::Validation(format!(
                "temple id {} must be positive",
                temple.id
            )));
        }

        if !seen_ids.insert(temple.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate temple id: {}",
                temple.id
            )));
        }

        if temple.city.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "temple {} has an empty city",
                temple.id
            )));
        }

        if temple.address.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "temple {} has an empty address",
                temple.id
            )));
        }

        if temple
            .region
            .as_deref()
            .is_some_and(|r| r.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "temple {} has an empty region; omit the field instead",
                temple.id
            )));
        }

        match (temple.latitude, temple.longitude) {
            (Some(latitude), Some(longitude)) => {
                if !Coordinates::new(latitude, longitude).is_valid() {
                    return Err(ConfigError::Validation(format!(
                        "temple {} has out-of-range coordinates ({latitude}, {longitude})",
                        temple.id
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "temple {} must set both latitude and longitude or neither",
                    temple.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "temples_test.rs"]
mod tests;
