use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, VolumeStore};
use crate::report::{
    Direction, MonthlyVolumeParser, ParsedReport, ReportWorkbook, Section, SheetSelector,
    WorkbookError,
};

/// Error types for volume import operations
#[derive(Debug, thiserror::Error)]
pub enum VolumeImportError {
    #[error("Report error: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("The {0} section has no site name")]
    MissingSiteName(Direction),

    #[error("Report has no Roadway (total) section")]
    MissingTotalSection,

    #[error("Parse task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Outcome of persisting one section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistStats {
    pub site_id: i64,
    pub recorded: usize,
    pub duplicates: usize,
}

/// Outcome of importing one report
#[derive(Debug, Clone, Serialize)]
pub struct ImportStats {
    pub site_name: String,
    pub site_id: i64,
    pub days: usize,
    pub readings_recorded: usize,
    pub duplicates_skipped: usize,
    pub duration_secs: f64,
}

/// Service persisting parsed MV03 reports into a `VolumeStore`
#[derive(Clone)]
pub struct VolumeImportService<S> {
    store: S,
}

impl<S: VolumeStore> VolumeImportService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Import a report file: parse the sheet, then persist its total section
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn import_file(
        &self,
        path: &Path,
        selector: SheetSelector,
    ) -> Result<ImportStats, VolumeImportError> {
        let start_time = Instant::now();
        let workbook_path = path.to_string_lossy().to_string();

        // calamine is synchronous
        let report = tokio::task::spawn_blocking(move || {
            ReportWorkbook::new(workbook_path).parse_with(&MonthlyVolumeParser::new(), &selector)
        })
        .await??;

        let mut stats = self.import_report(&report).await?;
        stats.duration_secs = start_time.elapsed().as_secs_f64();

        info!(
            "✓ Imported {} ({} days, {} readings, {} duplicates, {:.1}s)",
            stats.site_name,
            stats.days,
            stats.readings_recorded,
            stats.duplicates_skipped,
            stats.duration_secs
        );

        Ok(stats)
    }

    /// Persist the total section of a parsed report
    ///
    /// Positive and negative sections are not persisted here; callers that need them
    /// use `persist_section` directly.
    pub async fn import_report(
        &self,
        report: &ParsedReport,
    ) -> Result<ImportStats, VolumeImportError> {
        let total = report
            .section(Direction::Total)
            .ok_or(VolumeImportError::MissingTotalSection)?;

        for skipped in report.sections().filter(|s| s.direction != Direction::Total) {
            debug!(
                "Skipping {} section ({} days)",
                skipped.direction,
                skipped.volume_data.len()
            );
        }

        let persisted = self.persist_section(total).await?;

        Ok(ImportStats {
            site_name: total.site_name.clone().unwrap_or_default(),
            site_id: persisted.site_id,
            days: total.volume_data.len(),
            readings_recorded: persisted.recorded,
            duplicates_skipped: persisted.duplicates,
            duration_secs: 0.0,
        })
    }

    /// Expand a section into hourly readings and store each one
    ///
    /// Readings are written one at a time in ascending time order. Re-running on the
    /// same section records nothing new.
    #[instrument(skip(self, section), fields(direction = %section.direction, days = section.volume_data.len()))]
    pub async fn persist_section(
        &self,
        section: &Section,
    ) -> Result<PersistStats, VolumeImportError> {
        let site_name = section
            .site_name
            .as_deref()
            .ok_or(VolumeImportError::MissingSiteName(section.direction))?;

        let site_id = self
            .store
            .ensure_site(site_name, section.site_location.as_deref())
            .await?;

        let mut stats = PersistStats {
            site_id,
            ..PersistStats::default()
        };

        for reading in section.hourly_readings() {
            if self
                .store
                .record_hourly_volume(reading.timestamp, reading.volume, site_id)
                .await?
            {
                stats.recorded += 1;
            } else {
                stats.duplicates += 1;
            }
        }

        if stats.duplicates > 0 {
            warn!(
                "{} readings already stored for site {}, skipped",
                stats.duplicates, site_name
            );
        }
        debug!(
            "Persisted {} readings for site {} (id {})",
            stats.recorded, site_name, site_id
        );

        Ok(stats)
    }
}
