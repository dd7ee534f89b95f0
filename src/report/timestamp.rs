/// Date reconstruction for report day rows
///
/// Headers carry a free-text month name and a year; day rows carry only the day of
/// month. The three are combined into "2008-January-01 00:00" and resolved to epoch
/// seconds at midnight in the report's time zone.
use chrono::{NaiveDateTime, TimeZone};

const DATE_TEXT_FORMAT: &str = "%Y-%B-%d %H:%M";

/// Compose the textual midnight date for a report day
pub fn compose_date_text(year: i32, month: &str, day: u32) -> String {
    format!("{year}-{month}-{day:02} 00:00")
}

/// Parse composed date text into epoch seconds in `tz`
///
/// Returns `None` if the text is not a calendar date (e.g. "2008-April-31"), or if
/// midnight does not exist in `tz` on that day.
pub fn parse_local_midnight<Tz: TimeZone>(tz: &Tz, date_text: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(date_text, DATE_TEXT_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}
