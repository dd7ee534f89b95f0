use sqlx::PgPool;

use crate::db::{DbError, SiteRepository, VolumeRepository};

/// Storage the hourly expansion writes into
///
/// Both operations must be idempotent: importing the same report twice leaves the
/// store unchanged after the first run.
#[allow(async_fn_in_trait)]
pub trait VolumeStore {
    /// Id of the site named `site_name`, created on first use
    async fn ensure_site(
        &self,
        site_name: &str,
        site_location: Option<&str>,
    ) -> Result<i64, DbError>;

    /// Store one hourly reading; false if the site already has a reading at `timestamp`
    async fn record_hourly_volume(
        &self,
        timestamp: i64,
        volume: i64,
        site_id: i64,
    ) -> Result<bool, DbError>;
}

/// PostgreSQL-backed store over the `sites` and `volume_measurements` tables
#[derive(Clone)]
pub struct PgVolumeStore {
    sites: SiteRepository,
    volumes: VolumeRepository,
}

impl PgVolumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sites: SiteRepository::new(pool.clone()),
            volumes: VolumeRepository::new(pool),
        }
    }

    pub fn sites(&self) -> &SiteRepository {
        &self.sites
    }

    pub fn volumes(&self) -> &VolumeRepository {
        &self.volumes
    }
}

impl VolumeStore for PgVolumeStore {
    async fn ensure_site(
        &self,
        site_name: &str,
        site_location: Option<&str>,
    ) -> Result<i64, DbError> {
        self.sites.ensure_site(site_name, site_location).await
    }

    async fn record_hourly_volume(
        &self,
        timestamp: i64,
        volume: i64,
        site_id: i64,
    ) -> Result<bool, DbError> {
        self.volumes.insert_volume(timestamp, volume, site_id).await
    }
}
