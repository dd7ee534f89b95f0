/// Monthly Hourly Volume sheet parser
///
/// Walks a sheet once, top to bottom, classifying each row and feeding it to a
/// `SectionTracker`. The sheet itself is never modified.
use calamine::{Data, Range};
use chrono::{Local, TimeZone};
use tracing::{debug, info};

use crate::report::error::ParseError;
use crate::report::row_classifier::classify_row;
use crate::report::section::ParsedReport;
use crate::report::section_tracker::SectionTracker;

#[derive(Debug, Clone)]
pub struct MonthlyVolumeParser<Tz: TimeZone = Local> {
    tz: Tz,
}

impl MonthlyVolumeParser<Local> {
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl Default for MonthlyVolumeParser<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> MonthlyVolumeParser<Tz> {
    /// Parser resolving report days to midnight in `tz` instead of the local zone
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parse the used range of a worksheet
    ///
    /// Row numbers in errors are absolute sheet rows (0-indexed), even when the used
    /// range does not start at A1.
    pub fn parse_range(&self, range: &Range<Data>) -> Result<ParsedReport, ParseError> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let (row_count, col_count) = range.get_size();
        debug!(
            "Sheet range starts at row {} ({} rows x {} cols)",
            first_row, row_count, col_count
        );

        self.parse_rows_from(first_row, range.rows())
    }

    /// Parse rows in order, numbering them from 0
    pub fn parse_rows<'a, I>(&self, rows: I) -> Result<ParsedReport, ParseError>
    where
        I: IntoIterator<Item = &'a [Data]>,
    {
        self.parse_rows_from(0, rows)
    }

    fn parse_rows_from<'a, I>(&self, first_row: usize, rows: I) -> Result<ParsedReport, ParseError>
    where
        I: IntoIterator<Item = &'a [Data]>,
    {
        let mut tracker = SectionTracker::with_timezone(self.tz.clone());
        let mut rows_scanned = 0;

        for (offset, row) in rows.into_iter().enumerate() {
            tracker.apply(first_row + offset, classify_row(row))?;
            rows_scanned += 1;
        }

        let report = tracker.finish();
        for section in report.sections() {
            info!(
                "Parsed {} section for {} {}: site {:?}, {} days",
                section.direction,
                section.month,
                section.year,
                section.site_name.as_deref().unwrap_or("<unnamed>"),
                section.volume_data.len()
            );
        }
        debug!("Scanned {} rows", rows_scanned);

        Ok(report)
    }
}
