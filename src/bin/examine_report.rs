use calamine::DataType;
use std::env;

use traffic_volume_tracker::report::{
    classify_row, MonthlyVolumeParser, ReportWorkbook, RowKind, SheetSelector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let Some(file_path) = args.get(1) else {
        eprintln!("Usage: examine-report <REPORT_FILE> [SHEET]");
        std::process::exit(2);
    };

    // Allow specifying which sheet to examine
    let selector: SheetSelector = match args.get(2) {
        Some(sheet) => sheet.parse()?,
        None => SheetSelector::default(),
    };

    println!("Opening report: {file_path}");
    let workbook = ReportWorkbook::new(file_path.as_str());
    let range = workbook.read_sheet(&selector)?;
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    println!("\nExamining sheet: {selector}");
    println!("{}", "=".repeat(100));
    println!("Dimensions: {:?}", range.get_size());
    println!("{}", "=".repeat(100));

    for (offset, row) in range.rows().enumerate() {
        // Only print rows with data
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let kind = match classify_row(row) {
            RowKind::Header(_) => "HEADER".to_string(),
            RowKind::Label(labels) => match (labels.site_name, labels.location) {
                (Some(site), Some(loc)) => format!("SITE   {site:?} LOC {loc:?}"),
                (Some(site), None) => format!("SITE   {site:?}"),
                (None, Some(loc)) => format!("LOC    {loc:?}"),
                (None, None) => "-".to_string(),
            },
            RowKind::DateData(date_row) => {
                format!("DAY {:>2} ({} cells)", date_row.day, date_row.readings.len())
            }
            RowKind::Other => "-".to_string(),
        };

        print!("Row {:4} {:<28} ", first_row + offset + 1, kind);
        for cell in row.iter().take(8) {
            if cell.is_empty() {
                print!("[empty] ");
            } else {
                print!("[{cell}] ");
            }
        }
        println!();
    }

    println!("\n{}", "=".repeat(100));
    println!("Parsed sections:");
    println!("{}", "=".repeat(100));

    match MonthlyVolumeParser::new().parse_range(&range) {
        Ok(report) => {
            for section in report.sections() {
                println!(
                    "{:<8} {} {}: site {:?}, location {:?}, {} days",
                    section.direction.to_string(),
                    section.month,
                    section.year,
                    section.site_name,
                    section.site_location,
                    section.volume_data.len()
                );
            }
        }
        Err(e) => println!("Parse failed: {e}"),
    }

    Ok(())
}
