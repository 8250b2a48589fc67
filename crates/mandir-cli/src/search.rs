use std::path::PathBuf;

use clap::{ArgGroup, Args};
use mandir_core::{AppConfig, RawSearchRequest, SortKey, Temple};
use mandir_geocoder::{search_temples, Geocoder, NominatimClient, NominatimConfig};

use crate::or_dash;

/// Arguments for `search`. Exactly one location is required.
#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("location")
        .required(true)
        .args(["zip", "city", "state", "address", "lat"]),
))]
pub struct SearchArgs {
    /// US zip code (12345 or 12345-6789)
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    /// Free-form street address
    #[arg(long)]
    pub address: Option<String>,
    /// Latitude in degrees; requires --lon
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    /// Longitude in degrees; requires --lat
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Result order: distance, name or region
    #[arg(long, default_value = "distance")]
    pub sort: SortKey,
    /// Rank temples from a YAML file instead of the database
    #[arg(long)]
    pub temples_file: Option<PathBuf>,
}

impl SearchArgs {
    pub(crate) fn to_raw_request(&self) -> RawSearchRequest {
        RawSearchRequest {
            zipcode: self.zip.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            address: self.address.clone(),
            latitude: self.lat,
            longitude: self.lon,
            location_error: None,
            sort: Some(self.sort.to_string()),
        }
    }
}

pub(crate) async fn run(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let temples: Vec<Temple> = match &args.temples_file {
        Some(path) => mandir_core::load_temples(path)?.to_temples(),
        None => {
            let pool = crate::connect(config).await?;
            mandir_db::list_temples(&pool)
                .await?
                .into_iter()
                .map(Temple::from)
                .collect()
        }
    };

    tracing::debug!(temples = temples.len(), sort = %args.sort, "running search");

    let client = NominatimClient::new(&NominatimConfig::from_app_config(config))?;
    let geocoder = Geocoder::new(client);

    let outcome = match search_temples(&geocoder, &temples, &args.to_raw_request()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(error = %e, code = e.code(), "search failed");
            anyhow::bail!("{}", e.user_message());
        }
    };

    if outcome.temples.is_empty() {
        println!("no temples with known locations");
        return Ok(());
    }

    println!(
        "from {:.4}, {:.4} (sorted by {})",
        outcome.origin.latitude, outcome.origin.longitude, outcome.sort
    );
    println!("{:>10}  {:<20}{:<8}ADDRESS", "MILES", "CITY", "REGION");
    for ranked in &outcome.temples {
        println!(
            "{:>10.1}  {:<20}{:<8}{}",
            ranked.distance,
            ranked.temple.city,
            or_dash(ranked.temple.region.as_deref()),
            ranked.temple.address
        );
    }

    Ok(())
}
