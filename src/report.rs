// MV03 report module
//
// This module turns "Monthly Hourly Volume" spreadsheet reports into structured data.
// A report sheet contains up to three sections, each announced by a header row:
// - "Roadway, Monthly Hourly Volume for <Month> <Year>": both directions combined
// - "Pos ..." / "Neg ...": positive and negative direction counts
// Each section carries "Site Names:" / "Location:" label rows and one row per day
// ("Sun, 01" followed by 24 hourly counts and a daily total).

pub mod cell_matcher;
pub mod error;
pub mod parser;
pub mod row_classifier;
pub mod section;
pub mod section_tracker;
pub mod timestamp;
pub mod workbook;

pub use error::{ParseError, WorkbookError};
pub use parser::MonthlyVolumeParser;
pub use row_classifier::{classify_row, DateRow, RowKind, SiteLabels};
pub use section::{DailyRow, Direction, HourlyReading, ParsedReport, Section};
pub use section_tracker::{ScanState, SectionTracker};
pub use workbook::{ReportWorkbook, SheetSelector};
