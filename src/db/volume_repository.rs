use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::db::{DbError, VolumeMeasurement};

#[derive(Clone)]
pub struct VolumeRepository {
    pool: PgPool,
}

impl VolumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one hourly volume
    ///
    /// Returns false when a reading already exists for the site and timestamp; the
    /// stored reading is left untouched.
    #[instrument(skip(self), level = "trace")]
    pub async fn insert_volume(
        &self,
        timestamp: i64,
        volume: i64,
        site_id: i64,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO volume_measurements (timestamp, volume, site_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (site_id, timestamp) DO NOTHING
            "#,
        )
        .bind(timestamp)
        .bind(volume)
        .bind(site_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Readings for a site within `[start, end)`, oldest first
    #[instrument(skip(self))]
    pub async fn find_by_site(
        &self,
        site_id: i64,
        start: i64,
        end: i64,
    ) -> Result<Vec<VolumeMeasurement>, DbError> {
        debug!("Querying volumes for site {} from {} to {}", site_id, start, end);

        let measurements = sqlx::query_as::<_, VolumeMeasurement>(
            r#"
            SELECT id, timestamp, volume, site_id, created_at
            FROM volume_measurements
            WHERE site_id = $1 AND timestamp >= $2 AND timestamp < $3
            ORDER BY timestamp ASC
            "#,
        )
        .bind(site_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!("Found {} measurements", measurements.len());
        Ok(measurements)
    }

    #[instrument(skip(self))]
    pub async fn count_for_site(&self, site_id: i64) -> Result<usize, DbError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM volume_measurements WHERE site_id = $1")
                .bind(site_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count as usize)
    }
}
