use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sqlx::postgres::PgPoolOptions;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use traffic_volume_tracker::config::Config;
use traffic_volume_tracker::db::PgVolumeStore;
use traffic_volume_tracker::report::{ReportWorkbook, SheetSelector};
use traffic_volume_tracker::services::VolumeImportService;

/// File extensions picked up when a directory is given
const REPORT_EXTENSIONS: [&str; 4] = ["xls", "xlsx", "xlsm", "ods"];

#[derive(Parser)]
#[command(name = "traffic-volume-import")]
#[command(about = "Import MV03 monthly hourly volume reports into the traffic volume database", long_about = None)]
struct Cli {
    /// Report files, or directories containing report files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Sheet to read from each report: an index (0 = first sheet) or a sheet name
    #[arg(long)]
    sheet: Option<SheetSelector>,

    /// Parse the reports and print what would be imported without touching the database
    #[arg(long)]
    dry_run: bool,

    /// With --dry-run, print each parsed report as JSON
    #[arg(long, requires = "dry_run")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists (ignore errors if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,traffic_volume_tracker=debug")),
        )
        .init();

    let cli = Cli::parse();

    let files = collect_report_files(&cli.paths)?;
    if files.is_empty() {
        return Err("No report files found".into());
    }
    info!("Found {} report files", files.len());

    if cli.dry_run {
        return dry_run(&files, &cli.sheet.unwrap_or_default(), cli.json);
    }

    let config = Config::from_env()?;
    let selector = cli.sheet.unwrap_or_else(|| config.report_sheet.clone());

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Database connection established");

    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations completed");

    let service = VolumeImportService::new(PgVolumeStore::new(pool));
    let start_time = Instant::now();

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut recorded = 0;
    let mut duplicates = 0;
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for file in &files {
        pb.set_message(file_label(file));
        match service.import_file(file, selector.clone()).await {
            Ok(stats) => {
                recorded += stats.readings_recorded;
                duplicates += stats.duplicates_skipped;
            }
            Err(e) => {
                error!("Failed to import {}: {}", file.display(), e);
                failed.push((file.clone(), e.to_string()));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!("\n{}", "=".repeat(60));
    println!("Reports:            {}", files.len());
    println!("Failed:             {}", failed.len());
    println!("Readings recorded:  {recorded}");
    println!("Duplicates skipped: {duplicates}");
    println!("Total Time:         {:.2}s", start_time.elapsed().as_secs_f64());
    println!("{}", "=".repeat(60));

    for (file, reason) in &failed {
        println!("✗ {}: {}", file.display(), reason);
    }

    if !failed.is_empty() {
        return Err(format!("{} of {} reports failed to import", failed.len(), files.len()).into());
    }

    Ok(())
}

/// Parse every report and print its sections without writing anything
fn dry_run(
    files: &[PathBuf],
    selector: &SheetSelector,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut failures = 0;

    for file in files {
        let report = match ReportWorkbook::new(file.to_string_lossy()).parse(selector) {
            Ok(report) => report,
            Err(e) => {
                error!("Failed to parse {}: {}", file.display(), e);
                failures += 1;
                continue;
            }
        };

        if as_json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            continue;
        }

        println!("{}", file.display());
        if report.is_empty() {
            println!("  (no sections found)");
        }
        for section in report.sections() {
            println!(
                "  {:<8} {} {}  site: {}  location: {}  days: {}  hourly readings: {}",
                section.direction.to_string(),
                section.month,
                section.year,
                section.site_name.as_deref().unwrap_or("-"),
                section.site_location.as_deref().unwrap_or("-"),
                section.volume_data.len(),
                section.hourly_readings().count()
            );
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} reports failed to parse", files.len()).into());
    }

    Ok(())
}

/// Expand directories (non-recursively) into the report files they contain
fn collect_report_files(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_report_file(p))
            .collect();
        found.sort();

        if found.is_empty() {
            warn!("No report files in directory {}", path.display());
        }
        files.extend(found);
    }

    Ok(files)
}

fn is_report_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            REPORT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
