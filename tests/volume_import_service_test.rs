// Tests for VolumeImportService against an in-memory VolumeStore
// Covers hourly expansion order, idempotent re-runs and import error handling

mod common;

use chrono::{Local, NaiveDate, TimeZone, Utc};
use common::{
    as_slices, day_row, header_row, label_row, sample_report_rows, write_report_xlsx,
    InMemoryVolumeStore, SITE_LOCATION, SITE_NAME,
};
use traffic_volume_tracker::report::{
    DailyRow, Direction, MonthlyVolumeParser, ParsedReport, Section, SheetSelector,
};
use traffic_volume_tracker::services::{VolumeImportError, VolumeImportService};

fn parse_sample(days: u32) -> ParsedReport {
    let rows = sample_report_rows(days);
    MonthlyVolumeParser::with_timezone(Utc)
        .parse_rows(as_slices(&rows))
        .unwrap()
}

fn section_with_days(days: Vec<DailyRow>) -> Section {
    Section {
        direction: Direction::Total,
        site_name: Some("Site A".to_string()),
        site_location: Some("Main St".to_string()),
        year: 2008,
        month: "January".to_string(),
        volume_data: days,
    }
}

#[tokio::test]
async fn test_expansion_law_n_days_times_24_calls() {
    let report = parse_sample(5);
    let total = report.total.as_ref().unwrap();
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let stats = service.persist_section(total).await.unwrap();
    assert_eq!(stats.recorded, 5 * 24);
    assert_eq!(stats.duplicates, 0);

    let calls = service.store().record_calls();
    assert_eq!(calls.len(), 5 * 24);

    for (day_idx, day) in total.volume_data.iter().enumerate() {
        let day_calls = &calls[day_idx * 24..(day_idx + 1) * 24];
        assert_eq!(day_calls[0].0, day.timestamp);
        assert!(day_calls.windows(2).all(|w| w[0].0 < w[1].0));
        for (hour, call) in day_calls.iter().enumerate() {
            assert_eq!(call.0, day.timestamp + hour as i64 * 3600);
            assert_eq!(call.1, day.data[hour]);
            assert_eq!(call.2, stats.site_id);
        }
    }
}

#[tokio::test]
async fn test_daily_total_is_never_persisted() {
    let mut data = vec![7; 24];
    data.push(168);
    let section = section_with_days(vec![DailyRow { timestamp: 0, data }]);
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let stats = service.persist_section(&section).await.unwrap();
    assert_eq!(stats.recorded, 24);

    let calls = service.store().record_calls();
    assert_eq!(calls.len(), 24);
    assert!(calls.iter().all(|&(_, volume, _)| volume == 7));
    assert_eq!(calls.last().unwrap().0, 23 * 3600);
}

#[tokio::test]
async fn test_persisting_twice_is_idempotent() {
    let report = parse_sample(3);
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let first = service.import_report(&report).await.unwrap();
    let stored_after_first = service.store().stored();

    let second = service.import_report(&report).await.unwrap();
    let stored_after_second = service.store().stored();

    assert_eq!(first.readings_recorded, 72);
    assert_eq!(first.duplicates_skipped, 0);
    assert_eq!(second.readings_recorded, 0);
    assert_eq!(second.duplicates_skipped, 72);
    assert_eq!(first.site_id, second.site_id);
    assert_eq!(stored_after_first, stored_after_second);
    assert_eq!(service.store().sites().len(), 1);
}

#[tokio::test]
async fn test_import_report_persists_total_section_only() {
    let report = parse_sample(2);
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let stats = service.import_report(&report).await.unwrap();
    assert_eq!(stats.site_name, SITE_NAME);
    assert_eq!(stats.days, 2);
    assert_eq!(stats.readings_recorded, 48);
    assert_eq!(service.store().record_calls().len(), 48);
    assert_eq!(
        service.store().sites(),
        vec![(SITE_NAME.to_string(), Some(SITE_LOCATION.to_string()))]
    );
}

#[tokio::test]
async fn test_directional_section_can_be_persisted_explicitly() {
    let report = parse_sample(1);
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let positive = report.section(Direction::Positive).unwrap();
    let stats = service.persist_section(positive).await.unwrap();
    assert_eq!(stats.recorded, 24);
}

#[tokio::test]
async fn test_missing_total_section() {
    let rows = vec![
        header_row("Pos Direction, Monthly Hourly Volume for January 2008"),
        label_row("Site Names:", "Site A"),
        day_row("Tue, 01", &[1; 24]),
    ];
    let report = MonthlyVolumeParser::with_timezone(Utc)
        .parse_rows(as_slices(&rows))
        .unwrap();
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let result = service.import_report(&report).await;
    assert!(matches!(result, Err(VolumeImportError::MissingTotalSection)));
    assert!(service.store().record_calls().is_empty());
}

#[tokio::test]
async fn test_missing_site_name() {
    let mut section = section_with_days(vec![DailyRow {
        timestamp: 0,
        data: vec![1; 24],
    }]);
    section.site_name = None;
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let result = service.persist_section(&section).await;
    assert!(matches!(
        result,
        Err(VolumeImportError::MissingSiteName(Direction::Total))
    ));
    assert!(service.store().sites().is_empty());
}

#[tokio::test]
async fn test_sites_are_shared_across_reports() {
    let service = VolumeImportService::new(InMemoryVolumeStore::new());

    let january = section_with_days(vec![DailyRow {
        timestamp: 1_199_145_600,
        data: vec![1; 24],
    }]);
    let mut february = january.clone();
    february.month = "February".to_string();
    february.volume_data = vec![DailyRow {
        timestamp: 1_201_824_000,
        data: vec![2; 24],
    }];

    let first = service.persist_section(&january).await.unwrap();
    let second = service.persist_section(&february).await.unwrap();

    assert_eq!(first.site_id, second.site_id);
    assert_eq!(second.recorded, 24);
    assert_eq!(service.store().stored().len(), 48);
}

#[tokio::test]
async fn test_import_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MV03 - Site -0301 on 01-01-2008.xlsx");
    write_report_xlsx(&path, "MV03", &sample_report_rows(3));

    let service = VolumeImportService::new(InMemoryVolumeStore::new());
    let stats = service
        .import_file(&path, SheetSelector::default())
        .await
        .unwrap();

    assert_eq!(stats.site_name, SITE_NAME);
    assert_eq!(stats.days, 3);
    assert_eq!(stats.readings_recorded, 72);

    // import_file resolves days in the local time zone
    let jan_first = Local
        .from_local_datetime(
            &NaiveDate::from_ymd_opt(2008, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .earliest()
        .unwrap()
        .timestamp();
    let calls = service.store().record_calls();
    assert_eq!(calls[0].0, jan_first);
    assert_eq!(calls[0].1, 100);
}

#[tokio::test]
async fn test_import_file_missing_workbook() {
    let service = VolumeImportService::new(InMemoryVolumeStore::new());
    let result = service
        .import_file(
            std::path::Path::new("/nonexistent/report.xls"),
            SheetSelector::default(),
        )
        .await;

    assert!(matches!(result, Err(VolumeImportError::Workbook(_))));
}
