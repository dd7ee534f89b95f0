use sqlx::PgPool;
use tracing::{debug, error, info, instrument};

use crate::db::{DbError, Site};

#[derive(Clone)]
pub struct SiteRepository {
    pool: PgPool,
}

impl SiteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the id of the site named `site_name`, inserting it if needed
    ///
    /// Sites are de-duplicated by name. An existing site keeps the location it was
    /// first stored with.
    #[instrument(skip(self), fields(site_name = %site_name))]
    pub async fn ensure_site(
        &self,
        site_name: &str,
        site_location: Option<&str>,
    ) -> Result<i64, DbError> {
        let inserted: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO sites (site_name, site_location)
            VALUES ($1, $2)
            ON CONFLICT (site_name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(site_name)
        .bind(site_location)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(site_name = %site_name, error = %e, "Failed to insert site");
            e
        })?;

        if let Some(id) = inserted {
            info!("Inserted new site {} with id {}", site_name, id);
            return Ok(id);
        }

        let id: i64 = sqlx::query_scalar("SELECT id FROM sites WHERE site_name = $1")
            .bind(site_name)
            .fetch_one(&self.pool)
            .await?;

        debug!("Site {} exists with id {}, skipping insert", site_name, id);
        Ok(id)
    }

    #[instrument(skip(self), fields(site_name = %site_name))]
    pub async fn find_by_name(&self, site_name: &str) -> Result<Option<Site>, DbError> {
        debug!("Querying site by name");

        let site = sqlx::query_as::<_, Site>(
            r#"
            SELECT id, site_name, site_location, created_at
            FROM sites
            WHERE site_name = $1
            "#,
        )
        .bind(site_name)
        .fetch_optional(&self.pool)
        .await?;

        if site.is_some() {
            debug!("Found site");
        } else {
            debug!("Site not found");
        }

        Ok(site)
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<usize, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sites")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }
}
