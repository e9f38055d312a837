//! Common test fixtures for the admin tools.
//!
//! Real radiosonde stations and plausible reports at the 00Z/12Z launches.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;

use upperair_common::{PressureLevel, ReportSample, WeatherStation};

/// Stations used across tests.
pub mod stations {
    /// Dodge City, Kansas
    pub const DODGE_CITY: (&str, &str) = ("72451", "Dodge City");
    /// Denver, Colorado
    pub const DENVER: (&str, &str) = ("72469", "Denver");
    /// Oakland, California
    pub const OAKLAND: (&str, &str) = ("72493", "Oakland");
    /// Chatham, Massachusetts
    pub const CHATHAM: (&str, &str) = ("74494", "Chatham");
    /// Miami, Florida
    pub const MIAMI: (&str, &str) = ("72202", "Miami");
    /// Fairbanks, Alaska
    pub const FAIRBANKS: (&str, &str) = ("70261", "Fairbanks");

    pub const ALL: [(&str, &str); 6] = [DODGE_CITY, DENVER, OAKLAND, CHATHAM, MIAMI, FAIRBANKS];
}

pub fn station(fixture: (&str, &str)) -> WeatherStation {
    WeatherStation {
        station_id: fixture.0.to_string(),
        name: fixture.1.to_string(),
    }
}

/// Every station in `stations::ALL`.
pub fn all_stations() -> Vec<WeatherStation> {
    stations::ALL.iter().copied().map(station).collect()
}

/// 12Z launch on 2024-01-15.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
}

/// The `n`-th launch before `base_time()`, launches being 12 hours apart.
pub fn launch(n: i64) -> DateTime<Utc> {
    base_time() - Duration::hours(12 * n)
}

/// Standard-atmosphere temperature and height for a level.
fn standard_atmosphere(level: PressureLevel) -> (f64, f64) {
    match level {
        PressureLevel::Surface => (15.0, 0.0),
        PressureLevel::Hpa850 => (5.5, 1457.0),
        PressureLevel::Hpa700 => (-4.6, 3012.0),
        PressureLevel::Hpa500 => (-21.2, 5574.0),
        PressureLevel::Hpa200 => (-56.5, 11784.0),
    }
}

/// A report with standard-atmosphere values.
pub fn report(station_id: &str, level: PressureLevel, time: DateTime<Utc>) -> ReportSample {
    let (temperature, height) = standard_atmosphere(level);
    ReportSample {
        station_id: station_id.to_string(),
        level: level.code().to_string(),
        observation_time: time,
        temperature: Some(temperature),
        height: Some(height),
    }
}

/// One report per (station, level, launch) for the given launches.
pub fn sounding_grid(
    stations: &[WeatherStation],
    levels: &[PressureLevel],
    launches: usize,
) -> Vec<ReportSample> {
    let mut reports = Vec::new();
    for n in 0..launches as i64 {
        for station in stations {
            for level in levels {
                reports.push(report(&station.station_id, *level, launch(n)));
            }
        }
    }
    reports
}

/// Write a YAML config file that lives as long as the returned handle.
pub fn config_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(yaml.as_bytes()).expect("write temp config");
    file
}
