use thiserror::Error;

/// Errors raised while scanning a report sheet.
///
/// Every variant aborts the parse of the whole sheet: a section that lost track of
/// its header would silently attach later rows to the wrong direction or month.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed section header at row {row}: {header:?} (expected \"... for <Month> <Year>\")")]
    MalformedHeader { row: usize, header: String },

    #[error("Unknown traffic direction in header at row {row}: {header:?}")]
    UnknownDirection { row: usize, header: String },

    #[error("Invalid date at row {row}: {date:?}")]
    InvalidDate { row: usize, date: String },

    #[error("Date row {label:?} at row {row} appears before any section header")]
    OrphanDateRow { row: usize, label: String },

    #[error("Invalid reading at row {row}, col {column}: {message}")]
    InvalidReading {
        row: usize,
        column: usize,
        message: String,
    },

    #[error("Date row at row {row} has {found} hourly readings, expected at least 24")]
    IncompleteDay { row: usize, found: usize },
}

/// Errors raised while opening a workbook and selecting a sheet
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
