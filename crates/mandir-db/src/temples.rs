//! Database operations for the `temples` table.

use chrono::{DateTime, Utc};
use mandir_core::Temple;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `temples` table.
///
/// `latitude`/`longitude` are stored as `NUMERIC(9,6)` and selected as
/// `float8`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TempleRow {
    pub id: i64,
    pub city: String,
    pub address: String,
    pub region: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
    pub operating_hours: Option<String>,
    pub operating_days: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TempleRow> for Temple {
    fn from(row: TempleRow) -> Self {
        Temple {
            id: row.id,
            city: row.city,
            address: row.address,
            region: row.region,
            phone: row.phone,
            fax: row.fax,
            email: row.email,
            operating_hours: row.operating_hours,
            operating_days: row.operating_days,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active temples, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_temples(pool: &PgPool) -> Result<Vec<TempleRow>, DbError> {
    let rows = sqlx::query_as::<_, TempleRow>(
        "SELECT id, city, address, region, phone, fax, email, operating_hours, operating_days, \
                latitude::float8 AS latitude, longitude::float8 AS longitude, \
                is_active, created_at, updated_at \
         FROM temples \
         WHERE is_active = true \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active temple by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_temple(pool: &PgPool, id: i64) -> Result<Option<TempleRow>, DbError> {
    let row = sqlx::query_as::<_, TempleRow>(
        "SELECT id, city, address, region, phone, fax, email, operating_hours, operating_days, \
                latitude::float8 AS latitude, longitude::float8 AS longitude, \
                is_active, created_at, updated_at \
         FROM temples \
         WHERE id = $1 AND is_active = true",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
