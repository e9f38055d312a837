//! Tracing setup for the admin binaries.
//!
//! Logs go to stderr; stdout carries the report.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Map a `--log-level` value to a tracing level, defaulting to INFO.
pub fn parse_level(log_level: &str) -> Level {
    match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(parse_level(log_level))
        .with_target(true)
        .with_writer(std::io::stderr);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    Ok(())
}
