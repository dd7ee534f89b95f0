// Shared fixtures for integration tests: report row builders, an in-memory
// VolumeStore, and an .xlsx writer for end-to-end workbook tests
#![allow(dead_code)]

use calamine::Data;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use traffic_volume_tracker::db::{DbError, VolumeStore};

pub const SITE_NAME: &str = "-0301, 0080-129.000-";
pub const SITE_LOCATION: &str = "I-80 @ MP 129, Parleys Canyon";

pub fn text(s: &str) -> Data {
    Data::String(s.to_string())
}

pub fn header_row(header: &str) -> Vec<Data> {
    vec![Data::Empty, Data::Empty, text(header)]
}

pub fn label_row(label: &str, value: &str) -> Vec<Data> {
    vec![text(label), text(""), text(value)]
}

/// "Tue, 01" followed by the given readings as float cells (as spreadsheets store them)
pub fn day_row(label: &str, readings: &[i64]) -> Vec<Data> {
    let mut row = vec![text(label)];
    row.extend(readings.iter().map(|&v| Data::Float(v as f64)));
    row
}

/// 24 hourly readings for day `day`, followed by their daily total
pub fn day_readings(day: i64) -> Vec<i64> {
    let mut readings: Vec<i64> = (0..24).map(|hour| day * 100 + hour).collect();
    readings.push(readings.iter().sum());
    readings
}

fn column_headings() -> Vec<Data> {
    let mut row = vec![text("Date")];
    row.extend((0..24).map(|hour| text(&format!("{hour:02}:00"))));
    row.push(text("Total"));
    row
}

/// A January 2008 report: Roadway, Pos and Neg sections with `days` days each
pub fn sample_report_rows(days: u32) -> Vec<Vec<Data>> {
    const WEEKDAYS: [&str; 7] = ["Tue", "Wed", "Thu", "Fri", "Sat", "Sun", "Mon"];

    let mut rows = vec![
        vec![text("Utah Department of Transportation")],
        vec![text("MV03 - Hourly Volume Report by Month")],
    ];

    for direction in ["Roadway", "Pos Direction", "Neg Direction"] {
        rows.push(vec![]);
        rows.push(header_row(&format!(
            "{direction}, Monthly Hourly Volume for January 2008"
        )));
        rows.push(label_row("Site Names:", SITE_NAME));
        rows.push(label_row("Location:", SITE_LOCATION));
        rows.push(column_headings());
        for day in 1..=days {
            let label = format!("{}, {:02}", WEEKDAYS[(day as usize - 1) % 7], day);
            rows.push(day_row(&label, &day_readings(day as i64)));
        }
        rows.push(vec![text("Totals"), text("Sun, 01 - Thu, 31")]);
    }

    rows
}

pub fn as_slices(rows: &[Vec<Data>]) -> impl Iterator<Item = &[Data]> {
    rows.iter().map(Vec::as_slice)
}

/// Write rows to a single-sheet .xlsx file
pub fn write_report_xlsx(path: &Path, sheet_name: &str, rows: &[Vec<Data>]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).unwrap();

    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            match cell {
                Data::String(s) if !s.is_empty() => {
                    worksheet.write_string(r, c, s.as_str()).unwrap();
                }
                Data::Float(f) => {
                    worksheet.write_number(r, c, *f).unwrap();
                }
                Data::Int(i) => {
                    worksheet.write_number(r, c, *i as f64).unwrap();
                }
                _ => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

/// VolumeStore keeping sites and readings in memory, recording every call
#[derive(Default)]
pub struct InMemoryVolumeStore {
    sites: Mutex<Vec<(String, Option<String>)>>,
    volumes: Mutex<BTreeMap<(i64, i64), i64>>,
    record_calls: Mutex<Vec<(i64, i64, i64)>>,
}

impl InMemoryVolumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored (site_id, timestamp, volume) rows, ordered by site then time
    pub fn stored(&self) -> Vec<(i64, i64, i64)> {
        self.volumes
            .lock()
            .unwrap()
            .iter()
            .map(|(&(site_id, timestamp), &volume)| (site_id, timestamp, volume))
            .collect()
    }

    /// Every record_hourly_volume call as (timestamp, volume, site_id), in call order
    pub fn record_calls(&self) -> Vec<(i64, i64, i64)> {
        self.record_calls.lock().unwrap().clone()
    }

    pub fn sites(&self) -> Vec<(String, Option<String>)> {
        self.sites.lock().unwrap().clone()
    }
}

impl VolumeStore for InMemoryVolumeStore {
    async fn ensure_site(
        &self,
        site_name: &str,
        site_location: Option<&str>,
    ) -> Result<i64, DbError> {
        let mut sites = self.sites.lock().unwrap();
        if let Some(idx) = sites.iter().position(|(name, _)| name == site_name) {
            return Ok(idx as i64 + 1);
        }
        sites.push((site_name.to_string(), site_location.map(str::to_string)));
        Ok(sites.len() as i64)
    }

    async fn record_hourly_volume(
        &self,
        timestamp: i64,
        volume: i64,
        site_id: i64,
    ) -> Result<bool, DbError> {
        self.record_calls
            .lock()
            .unwrap()
            .push((timestamp, volume, site_id));

        let mut volumes = self.volumes.lock().unwrap();
        if volumes.contains_key(&(site_id, timestamp)) {
            return Ok(false);
        }
        volumes.insert((site_id, timestamp), volume);
        Ok(true)
    }
}
