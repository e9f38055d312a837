//! Common types and utilities shared across the upper-air admin tools.

pub mod error;
pub mod level;
pub mod observation;
pub mod time;

pub use error::{AdminError, AdminResult};
pub use level::{MapLevel, MapType, PressureLevel};
pub use observation::{LevelCount, ObservationTimeCount, ReportSample, WeatherStation};
pub use time::format_observation_time;
