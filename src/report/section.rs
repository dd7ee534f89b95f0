use serde::Serialize;
use std::fmt;

use crate::report::error::ParseError;

/// Hourly readings per day; a report row carries a daily total after them
pub const HOURS_PER_DAY: usize = 24;
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Traffic direction of a report section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Both directions combined ("Roadway" header)
    Total,
    Positive,
    Negative,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::Total, Direction::Positive, Direction::Negative];

    /// Detect the direction marker in a header row
    ///
    /// Markers are checked in order: "Pos", "Neg", "Roadway".
    pub fn from_header(header: &str) -> Option<Self> {
        if header.contains("Pos") {
            Some(Direction::Positive)
        } else if header.contains("Neg") {
            Some(Direction::Negative)
        } else if header.contains("Roadway") {
            Some(Direction::Total)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Total => write!(f, "total"),
            Direction::Positive => write!(f, "positive"),
            Direction::Negative => write!(f, "negative"),
        }
    }
}

/// Direction, month and year announced by a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub direction: Direction,
    pub month: String,
    pub year: i32,
}

impl SectionHeader {
    /// Parse "Roadway, Monthly Hourly Volume for January 2008"
    ///
    /// `row` is only used for error reporting.
    pub fn parse(header: &str, row: usize) -> Result<Self, ParseError> {
        let direction = Direction::from_header(header).ok_or_else(|| {
            ParseError::UnknownDirection {
                row,
                header: header.to_string(),
            }
        })?;

        let malformed = || ParseError::MalformedHeader {
            row,
            header: header.to_string(),
        };

        let (_, period) = header.split_once(" for ").ok_or_else(malformed)?;
        let mut tokens = period.split_whitespace();
        let month = tokens.next().ok_or_else(malformed)?;
        let year = tokens
            .next()
            .and_then(|y| y.parse::<i32>().ok())
            .ok_or_else(malformed)?;

        Ok(SectionHeader {
            direction,
            month: month.to_string(),
            year,
        })
    }
}

/// One day of hourly volumes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRow {
    /// Epoch seconds at local midnight
    pub timestamp: i64,
    /// Hourly counts for hours 0..24, optionally followed by the daily total
    pub data: Vec<i64>,
}

/// A single hour of traffic at a site, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyReading {
    pub timestamp: i64,
    pub volume: i64,
    pub site_name: Option<String>,
    pub site_location: Option<String>,
}

/// Accumulated state of one direction's section within a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub direction: Direction,
    pub site_name: Option<String>,
    pub site_location: Option<String>,
    pub year: i32,
    pub month: String,
    pub volume_data: Vec<DailyRow>,
}

impl Section {
    pub fn new(header: SectionHeader) -> Self {
        Self {
            direction: header.direction,
            site_name: None,
            site_location: None,
            year: header.year,
            month: header.month,
            volume_data: Vec::new(),
        }
    }

    /// Expand every day into its 24 hourly readings
    ///
    /// Values past the 24th hour (the daily total column) are never yielded. Readings
    /// come out in ascending day order, then ascending hour order.
    pub fn hourly_readings(&self) -> impl Iterator<Item = HourlyReading> + '_ {
        self.volume_data.iter().flat_map(move |day| {
            day.data
                .iter()
                .take(HOURS_PER_DAY)
                .enumerate()
                .map(move |(hour, &volume)| HourlyReading {
                    timestamp: day.timestamp + hour as i64 * SECONDS_PER_HOUR,
                    volume,
                    site_name: self.site_name.clone(),
                    site_location: self.site_location.clone(),
                })
        })
    }
}

/// Result of scanning a whole sheet: at most one section per direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedReport {
    pub total: Option<Section>,
    pub positive: Option<Section>,
    pub negative: Option<Section>,
}

impl ParsedReport {
    pub fn section(&self, direction: Direction) -> Option<&Section> {
        match direction {
            Direction::Total => self.total.as_ref(),
            Direction::Positive => self.positive.as_ref(),
            Direction::Negative => self.negative.as_ref(),
        }
    }

    pub fn section_mut(&mut self, direction: Direction) -> Option<&mut Section> {
        self.slot(direction).as_mut()
    }

    /// Open the section for `header.direction`, or re-open it with the new period
    ///
    /// Re-opening keeps site metadata and previously accumulated days. Returns true
    /// when the section already existed.
    pub fn open_section(&mut self, header: SectionHeader) -> bool {
        let slot = self.slot(header.direction);
        if let Some(existing) = slot.as_mut() {
            existing.year = header.year;
            existing.month = header.month;
            return true;
        }

        *slot = Some(Section::new(header));
        false
    }

    /// Sections present in the report, in total/positive/negative order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.section(direction))
    }

    pub fn is_empty(&self) -> bool {
        self.sections().next().is_none()
    }

    fn slot(&mut self, direction: Direction) -> &mut Option<Section> {
        match direction {
            Direction::Total => &mut self.total,
            Direction::Positive => &mut self.positive,
            Direction::Negative => &mut self.negative,
        }
    }
}
