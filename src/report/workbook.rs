use calamine::{open_workbook_auto, Data, Range, Reader};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::report::error::WorkbookError;
use crate::report::parser::MonthlyVolumeParser;
use crate::report::section::ParsedReport;

/// Which worksheet of a report workbook to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    /// MV03 reports keep their data on the first sheet
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// Digits select by index, anything else by name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(trimmed.to_string()),
        })
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "#{index}"),
            SheetSelector::Name(name) => write!(f, "{name}"),
        }
    }
}

/// A Monthly Hourly Volume report workbook (.xls, .xlsx, .xlsm or .ods)
pub struct ReportWorkbook {
    workbook_path: String,
}

impl ReportWorkbook {
    pub fn new(workbook_path: impl Into<String>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.workbook_path
    }

    /// Read the used range of the selected sheet
    ///
    /// This is synchronous, callers on an async runtime should use spawn_blocking.
    pub fn read_sheet(&self, selector: &SheetSelector) -> Result<Range<Data>, WorkbookError> {
        let mut workbook = open_workbook_auto(&self.workbook_path)
            .map_err(|e| WorkbookError::WorkbookOpen(e.to_string()))?;

        let sheet_names = workbook.sheet_names();
        debug!(
            "Workbook {} has {} sheets: {:?}",
            self.workbook_path,
            sheet_names.len(),
            sheet_names
        );

        let sheet_name = match selector {
            SheetSelector::Index(index) => sheet_names
                .get(*index)
                .cloned()
                .ok_or_else(|| WorkbookError::SheetNotFound(selector.to_string()))?,
            SheetSelector::Name(name) => name.clone(),
        };

        workbook
            .worksheet_range(&sheet_name)
            .map_err(|_| WorkbookError::SheetNotFound(sheet_name))
    }

    /// Parse the selected sheet with days resolved to local midnight
    pub fn parse(&self, selector: &SheetSelector) -> Result<ParsedReport, WorkbookError> {
        self.parse_with(&MonthlyVolumeParser::new(), selector)
    }

    /// Parse the selected sheet with a specific parser
    pub fn parse_with<Tz: chrono::TimeZone>(
        &self,
        parser: &MonthlyVolumeParser<Tz>,
        selector: &SheetSelector,
    ) -> Result<ParsedReport, WorkbookError> {
        info!("Parsing report {} (sheet {})", self.workbook_path, selector);
        let range = self.read_sheet(selector)?;
        Ok(parser.parse_range(&range)?)
    }
}
