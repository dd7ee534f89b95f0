/// Section tracking state machine
///
/// Rows are fed in sheet order, one classified row per step. A header row opens (or
/// re-opens) the section for its direction; label and day rows then apply to whichever
/// section is currently open.
use calamine::Data;
use chrono::{Local, TimeZone};
use tracing::{debug, warn};

use crate::report::error::ParseError;
use crate::report::row_classifier::{DateRow, RowKind, SiteLabels};
use crate::report::section::{DailyRow, Direction, ParsedReport, SectionHeader, HOURS_PER_DAY};
use crate::report::timestamp::{compose_date_text, parse_local_midnight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NoSectionOpen,
    SectionOpen(Direction),
}

pub struct SectionTracker<Tz: TimeZone = Local> {
    tz: Tz,
    state: ScanState,
    report: ParsedReport,
}

impl SectionTracker<Local> {
    pub fn new() -> Self {
        Self::with_timezone(Local)
    }
}

impl Default for SectionTracker<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> SectionTracker<Tz> {
    /// Tracker resolving day rows to midnight in `tz`
    pub fn with_timezone(tz: Tz) -> Self {
        Self {
            tz,
            state: ScanState::NoSectionOpen,
            report: ParsedReport::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn report(&self) -> &ParsedReport {
        &self.report
    }

    /// Apply one classified row; `row` is the sheet row index used in errors
    pub fn apply(&mut self, row: usize, kind: RowKind<'_>) -> Result<(), ParseError> {
        match kind {
            RowKind::Header(header) => self.open_section(row, &header),
            RowKind::Label(labels) => {
                self.record_labels(row, labels);
                Ok(())
            }
            RowKind::DateData(date_row) => self.append_day(row, date_row),
            RowKind::Other => Ok(()),
        }
    }

    /// Finish the scan and hand back the accumulated sections
    pub fn finish(self) -> ParsedReport {
        self.report
    }

    fn open_section(&mut self, row: usize, header: &str) -> Result<(), ParseError> {
        let parsed = SectionHeader::parse(header, row)?;
        let direction = parsed.direction;

        debug!(
            "Opening {} section for {} {} at row {}",
            direction, parsed.month, parsed.year, row
        );

        if self.report.open_section(parsed) {
            warn!(
                "Section {} re-opened at row {}; new days will be appended to the existing ones",
                direction, row
            );
        }

        self.state = ScanState::SectionOpen(direction);
        Ok(())
    }

    fn record_labels(&mut self, row: usize, labels: SiteLabels) {
        let ScanState::SectionOpen(direction) = self.state else {
            warn!(
                "Label row {:?} at row {} precedes any section header, ignoring",
                labels, row
            );
            return;
        };

        if let Some(section) = self.report.section_mut(direction) {
            if let Some(site_name) = labels.site_name {
                section.site_name = Some(site_name);
            }
            if let Some(location) = labels.location {
                section.site_location = Some(location);
            }
        }
    }

    fn append_day(&mut self, row: usize, date_row: DateRow<'_>) -> Result<(), ParseError> {
        let orphan = || ParseError::OrphanDateRow {
            row,
            label: date_row.label.clone(),
        };

        let ScanState::SectionOpen(direction) = self.state else {
            return Err(orphan());
        };
        let section = self.report.section_mut(direction).ok_or_else(orphan)?;

        let date_text = compose_date_text(section.year, &section.month, date_row.day);
        let timestamp = parse_local_midnight(&self.tz, &date_text).ok_or_else(|| {
            ParseError::InvalidDate {
                row,
                date: date_text.clone(),
            }
        })?;

        let data = parse_readings(row, date_row.readings)?;
        section.volume_data.push(DailyRow { timestamp, data });

        Ok(())
    }
}

/// Convert the cells after a date label into hourly volumes
///
/// The 24 hourly cells are strict: a bad value or an early blank fails the row. Cells
/// after them (daily total, averages, footnote marks) are kept while they are integral
/// and otherwise end the row quietly. Cells sit one column right of their index, since
/// column 0 holds the date label.
fn parse_readings(row: usize, cells: &[Data]) -> Result<Vec<i64>, ParseError> {
    let mut readings = Vec::with_capacity(cells.len());

    for (idx, cell) in cells.iter().enumerate().take(HOURS_PER_DAY) {
        match reading_value(cell) {
            Ok(Some(volume)) => readings.push(volume),
            Ok(None) => break,
            Err(message) => {
                return Err(ParseError::InvalidReading {
                    row,
                    column: idx + 1,
                    message,
                })
            }
        }
    }

    if readings.len() < HOURS_PER_DAY {
        return Err(ParseError::IncompleteDay {
            row,
            found: readings.len(),
        });
    }

    let trailing = cells[HOURS_PER_DAY..]
        .iter()
        .map_while(|cell| reading_value(cell).ok().flatten());
    readings.extend(trailing);

    Ok(readings)
}

/// Parse a volume cell; `Ok(None)` for a blank cell
fn reading_value(cell: &Data) -> Result<Option<i64>, String> {
    match cell {
        Data::Int(i) => Ok(Some(*i)),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                Ok(Some(*f as i64))
            } else {
                Err(format!("Non-integral volume: {f}"))
            }
        }
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                trimmed
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| format!("Cannot parse volume value: {s}"))
            }
        }
        Data::Empty => Ok(None),
        other => Err(format!("Expected number, got: {other:?}")),
    }
}
