//! `fetch_upperair` - run the upper-air fetch now and report the outcome.

use std::io::Write;
use tracing::{error, info};

use upperair_common::AdminResult;

use crate::output::Output;
use crate::tasks::UpperAirFetch;

/// Trigger the fetch and report how it went.
///
/// Fetch failures are printed and logged, never returned; the result is
/// `Ok(false)` in that case. Only output errors are returned.
pub async fn run<W: Write>(task: &dyn UpperAirFetch, out: &mut Output<W>) -> AdminResult<bool> {
    out.success("Starting upper air data fetch...")?;

    match task.fetch().await {
        Ok(outcome) => {
            out.success("Successfully fetched upper air data!")?;
            if let Some(reports) = outcome.reports_saved {
                out.line(format!(
                    "  - {} reports saved from {} stations",
                    reports,
                    outcome.stations_saved.unwrap_or_default()
                ))?;
            }
            info!(reports_saved = ?outcome.reports_saved, "Upper air fetch finished");
            Ok(true)
        }
        Err(e) => {
            out.error(format!("Error fetching upper air data: {:#}", e))?;
            error!("Error in fetch_upperair command: {:?}", e);
            Ok(false)
        }
    }
}
