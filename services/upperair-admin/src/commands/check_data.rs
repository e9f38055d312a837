//! `check_upperair_data` - summarize upper-air stations and reports.

use std::io::Write;
use tracing::{info, instrument};

use storage::ObservationStore;
use upperair_common::{format_observation_time, AdminResult};

use crate::output::Output;

/// Stations listed under "Sample stations".
pub const SAMPLE_STATIONS: usize = 5;

/// Distinct observation times listed, newest first.
pub const RECENT_TIMES: usize = 5;

/// Reports listed under "Sample reports".
pub const SAMPLE_REPORTS: usize = 3;

pub const NO_REPORTS_WARNING: &str =
    "No upper air reports found. Run \"fetch_upperair\" to fetch data.";

/// Totals found by a data check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataCheck {
    pub station_count: u64,
    pub report_count: u64,
}

/// Print the data summary. Store errors are returned unchanged.
#[instrument(skip_all)]
pub async fn run<W: Write>(
    store: &dyn ObservationStore,
    out: &mut Output<W>,
) -> AdminResult<DataCheck> {
    out.success("Checking upper air data...")?;

    let station_count = store.count_stations().await?;
    out.line(format!("Total upper air stations: {}", station_count))?;

    if station_count > 0 {
        out.line("Sample stations:")?;
        for station in store.sample_stations(SAMPLE_STATIONS).await? {
            out.line(format!("  - {}: {}", station.station_id, station.name))?;
        }
    }

    let report_count = store.count_reports().await?;
    out.blank()?;
    out.line(format!("Total upper air reports: {}", report_count))?;

    if report_count > 0 {
        out.blank()?;
        out.line("Reports by level:")?;
        for level in store.reports_by_level().await? {
            out.line(format!("  - {}: {} reports", level.level, level.count))?;
        }

        out.blank()?;
        out.line("Most recent observation times:")?;
        for time in store.recent_observation_times(RECENT_TIMES).await? {
            out.line(format!(
                "  - {}: {} reports",
                format_observation_time(&time.observation_time),
                time.count
            ))?;
        }

        out.blank()?;
        out.line("Sample reports:")?;
        for report in store.sample_reports(SAMPLE_REPORTS).await? {
            out.line(format!("  - {}", report.summary_line()))?;
        }
    } else {
        out.blank()?;
        out.warning(NO_REPORTS_WARNING)?;
    }

    info!(station_count, report_count, "Upper air data check complete");
    Ok(DataCheck {
        station_count,
        report_count,
    })
}
