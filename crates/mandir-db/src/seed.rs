use mandir_core::TempleConfig;
use sqlx::PgPool;

use crate::DbError;

/// Upsert temples from the data file into the database.
///
/// Returns the number of temples processed (inserted or updated). Missing
/// regions are filled from the address before writing. All upserts run inside
/// a single transaction; if any operation fails the entire batch is rolled
/// back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_temples(pool: &PgPool, temples: &[TempleConfig]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for config in temples {
        let temple = config.to_temple();

        sqlx::query(
            "INSERT INTO temples (id, city, address, region, phone, fax, email, \
                                  operating_hours, operating_days, latitude, longitude, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10::float8, $11::float8, true) \
             ON CONFLICT (id) DO UPDATE SET \
                 city = EXCLUDED.city, \
                 address = EXCLUDED.address, \
                 region = EXCLUDED.region, \
                 phone = EXCLUDED.phone, \
                 fax = EXCLUDED.fax, \
                 email = EXCLUDED.email, \
                 operating_hours = EXCLUDED.operating_hours, \
                 operating_days = EXCLUDED.operating_days, \
                 latitude = EXCLUDED.latitude, \
                 longitude = EXCLUDED.longitude, \
                 is_active = true, \
                 updated_at = NOW()",
        )
        .bind(temple.id)
        .bind(&temple.city)
        .bind(&temple.address)
        .bind(&temple.region)
        .bind(&temple.phone)
        .bind(&temple.fax)
        .bind(&temple.email)
        .bind(&temple.operating_hours)
        .bind(&temple.operating_days)
        .bind(temple.latitude)
        .bind(temple.longitude)
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    tracing::info!(count, "seeded temples");
    Ok(count)
}
