/// Row classification for MV03 report sheets
///
/// Every row of a report is one of: a section header, a site label, a day of hourly
/// counts, or something the parser does not care about (blank separators, column
/// headings, footnotes).
use calamine::Data;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::report::cell_matcher::{cell_text, first_non_blank_after_label, match_label_in_row};

/// Substring present in every section header row
pub const REPORT_TYPE_HEADER: &str = "Monthly Hourly Volume";

pub const SITE_NAME_LABEL: &str = "Site Names:";
pub const LOCATION_LABEL: &str = "Location:";

/// "Sun, 01" .. "Sat, 31"
static DATE_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Sun|Mon|Tue|Wed|Thu|Fri|Sat), (\d{1,2})$").expect("valid date label regex")
});

/// Site metadata found on a label row; at least one field is set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteLabels {
    pub site_name: Option<String>,
    pub location: Option<String>,
}

/// A day of readings: the date label from column 0 and the cells that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct DateRow<'a> {
    pub label: String,
    pub day: u32,
    pub readings: &'a [Data],
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind<'a> {
    Header(String),
    Label(SiteLabels),
    DateData(DateRow<'a>),
    Other,
}

/// Classify a row in a single pass
///
/// Header rows take precedence, then date rows, then label rows. Site name and
/// location are looked up independently, so one row may carry both.
pub fn classify_row(row: &[Data]) -> RowKind<'_> {
    if let Some(header) = is_section_header_row(row) {
        return RowKind::Header(header);
    }
    if let Some(date_row) = is_date_row(row) {
        return RowKind::DateData(date_row);
    }

    let labels = SiteLabels {
        site_name: is_site_name_row(row),
        location: is_location_row(row),
    };
    if labels.site_name.is_some() || labels.location.is_some() {
        return RowKind::Label(labels);
    }
    RowKind::Other
}

/// Header text if the row announces a new report section
pub fn is_section_header_row(row: &[Data]) -> Option<String> {
    match_label_in_row(row, REPORT_TYPE_HEADER).map(|m| m.contents)
}

/// Site name if the row is a "Site Names:" label row with a value
pub fn is_site_name_row(row: &[Data]) -> Option<String> {
    first_non_blank_after_label(row, SITE_NAME_LABEL).map(|m| m.contents)
}

/// Site location if the row is a "Location:" label row with a value
pub fn is_location_row(row: &[Data]) -> Option<String> {
    first_non_blank_after_label(row, LOCATION_LABEL).map(|m| m.contents)
}

/// Date row if column 0 holds a "Weekday, DD" label
///
/// Only the first column is checked; totals and footnote columns elsewhere in the row
/// may contain date-like text.
pub fn is_date_row(row: &[Data]) -> Option<DateRow<'_>> {
    let (first, readings) = row.split_first()?;
    let text = cell_text(first);
    let label = text.trim();

    let captures = DATE_LABEL_RE.captures(label)?;
    let day = captures.get(2)?.as_str().parse::<u32>().ok()?;

    Some(DateRow {
        label: label.to_string(),
        day,
        readings,
    })
}
