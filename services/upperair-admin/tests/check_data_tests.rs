//! Tests for the upper-air data check report.

use test_utils::{fixtures, FailingStore, MemoryStore};
use upperair_admin::commands::check_data::{self, NO_REPORTS_WARNING};
use upperair_admin::Output;
use upperair_common::{AdminError, PressureLevel};

async fn report_for(store: &MemoryStore) -> String {
    let mut out = Output::buffer();
    check_data::run(store, &mut out).await.unwrap();
    out.text()
}

/// Lines between a section header and the next blank line.
fn section<'a>(text: &'a str, header: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| !line.contains(header))
        .skip(1)
        .take_while(|line| !line.trim().is_empty())
        .collect()
}

fn count_of(line: &str) -> u64 {
    line.rsplit(": ")
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap()
}

#[tokio::test]
async fn test_empty_database_warns_to_fetch() {
    let text = report_for(&MemoryStore::default()).await;

    assert!(text.contains("Total upper air stations: 0"));
    assert!(text.contains("Total upper air reports: 0"));
    assert!(text.contains(NO_REPORTS_WARNING));
    assert!(text.contains("No upper air reports found. Run \"fetch_upperair\" to fetch data."));
    assert!(!text.contains("Sample stations:"));
    assert!(!text.contains("Reports by level:"));
}

#[tokio::test]
async fn test_stations_without_reports() {
    let store = MemoryStore::new(fixtures::all_stations(), vec![]);
    let text = report_for(&store).await;

    assert!(text.contains("Total upper air stations: 6"));
    let samples = section(&text, "Sample stations:");
    assert_eq!(samples.len(), 5);
    assert_eq!(samples[0], "  - 72451: Dodge City");
    assert!(text.contains(NO_REPORTS_WARNING));
}

#[tokio::test]
async fn test_level_histogram_sums_to_report_count() {
    let reports = fixtures::sounding_grid(
        &fixtures::all_stations()[..3],
        &[PressureLevel::Surface, PressureLevel::Hpa500],
        4,
    );
    let total = reports.len() as u64;
    let store = MemoryStore::new(fixtures::all_stations(), reports);
    let text = report_for(&store).await;

    assert!(text.contains(&format!("Total upper air reports: {}", total)));

    let levels = section(&text, "Reports by level:");
    assert_eq!(levels.len(), 2);
    assert!(levels[0].starts_with("  - 500HPA: "));
    assert!(levels[1].starts_with("  - SURFACE: "));
    assert_eq!(levels.iter().map(|l| count_of(l)).sum::<u64>(), total);
    assert!(!text.contains("No upper air reports found"));
}

#[tokio::test]
async fn test_recent_times_capped_and_descending() {
    let reports = fixtures::sounding_grid(
        &fixtures::all_stations()[..2],
        &[PressureLevel::Hpa850],
        8,
    );
    let store = MemoryStore::new(fixtures::all_stations(), reports);
    let text = report_for(&store).await;

    let times = section(&text, "Most recent observation times:");
    assert_eq!(times.len(), 5);
    assert_eq!(times[0], "  - 2024-01-15 12:00:00+00:00: 2 reports");
    assert_eq!(times[1], "  - 2024-01-15 00:00:00+00:00: 2 reports");

    // "  - YYYY-MM-DD HH:MM:SS+00:00" sorts lexically like the timestamps
    let mut sorted = times.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);
}

#[tokio::test]
async fn test_fewer_times_than_limit() {
    let reports = fixtures::sounding_grid(
        &fixtures::all_stations()[..1],
        &[PressureLevel::Hpa700],
        2,
    );
    let store = MemoryStore::new(fixtures::all_stations(), reports);
    let text = report_for(&store).await;

    assert_eq!(section(&text, "Most recent observation times:").len(), 2);
}

#[tokio::test]
async fn test_sample_reports_show_station_and_values() {
    let reports = fixtures::sounding_grid(
        &fixtures::all_stations()[..1],
        &[PressureLevel::Surface, PressureLevel::Hpa850, PressureLevel::Hpa500, PressureLevel::Hpa200],
        1,
    );
    let store = MemoryStore::new(fixtures::all_stations(), reports);
    let text = report_for(&store).await;

    let samples = section(&text, "Sample reports:");
    assert_eq!(samples.len(), 3);
    assert_eq!(
        samples[1],
        "  - Station: 72451, Level: 850HPA, Time: 2024-01-15 12:00:00+00:00, Temp: 5.5°C, Height: 1457.0m"
    );
}

#[tokio::test]
async fn test_unknown_level_is_listed() {
    let mut report = fixtures::report("72451", PressureLevel::Hpa500, fixtures::launch(0));
    report.level = "925HPA".to_string();
    let store = MemoryStore::new(fixtures::all_stations(), vec![report]);
    let text = report_for(&store).await;

    assert!(text.contains("  - 925HPA: 1 reports"));
}

#[tokio::test]
async fn test_returns_totals() {
    let reports = fixtures::sounding_grid(&fixtures::all_stations(), &[PressureLevel::Surface], 1);
    let store = MemoryStore::new(fixtures::all_stations(), reports);
    let mut out = Output::buffer();

    let check = check_data::run(&store, &mut out).await.unwrap();
    assert_eq!(check.station_count, 6);
    assert_eq!(check.report_count, 6);
}

#[tokio::test]
async fn test_store_errors_propagate() {
    let store = FailingStore::new("connection refused");
    let mut out = Output::buffer();

    let err = check_data::run(&store, &mut out).await.unwrap_err();
    assert!(matches!(err, AdminError::DatabaseError(ref m) if m == "connection refused"));
    assert!(out.text().contains("Checking upper air data..."));
}
