//! Read models for stations and upper-air SYNOP reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{format_observation_time, PressureLevel};

/// An upper-air weather station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStation {
    /// WMO station code, e.g. "72451"
    pub station_id: String,
    pub name: String,
}

/// Number of reports recorded at one level.
///
/// The level is kept as the stored string: the database does not enforce the
/// choice set, so unknown codes must still be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: String,
    pub count: u64,
}

impl LevelCount {
    pub fn pressure_level(&self) -> Option<PressureLevel> {
        self.level.parse().ok()
    }
}

/// Number of reports sharing one observation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationTimeCount {
    pub observation_time: DateTime<Utc>,
    pub count: u64,
}

/// A report joined with its station code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSample {
    pub station_id: String,
    pub level: String,
    pub observation_time: DateTime<Utc>,
    /// Air temperature in °C
    pub temperature: Option<f64>,
    /// Geopotential height in metres
    pub height: Option<f64>,
}

impl ReportSample {
    pub fn pressure_level(&self) -> Option<PressureLevel> {
        self.level.parse().ok()
    }

    /// One-line summary used by the data check report.
    pub fn summary_line(&self) -> String {
        format!(
            "Station: {}, Level: {}, Time: {}, Temp: {}, Height: {}",
            self.station_id,
            self.level,
            format_observation_time(&self.observation_time),
            with_unit(self.temperature, "°C"),
            with_unit(self.height, "m"),
        )
    }
}

/// Floats keep their decimal point, so 1457.0 prints as "1457.0", not "1457".
fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:?}{}", v, unit),
        None => "n/a".to_string(),
    }
}
