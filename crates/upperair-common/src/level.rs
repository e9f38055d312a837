//! Pressure levels and exported-map choice sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AdminError;

/// Atmospheric pressure level at which an upper-air observation is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PressureLevel {
    #[serde(rename = "SURFACE")]
    Surface,
    #[serde(rename = "850HPA")]
    Hpa850,
    #[serde(rename = "700HPA")]
    Hpa700,
    #[serde(rename = "500HPA")]
    Hpa500,
    #[serde(rename = "200HPA")]
    Hpa200,
}

impl PressureLevel {
    pub const ALL: [PressureLevel; 5] = [
        PressureLevel::Surface,
        PressureLevel::Hpa850,
        PressureLevel::Hpa700,
        PressureLevel::Hpa500,
        PressureLevel::Hpa200,
    ];

    /// Code stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            PressureLevel::Surface => "SURFACE",
            PressureLevel::Hpa850 => "850HPA",
            PressureLevel::Hpa700 => "700HPA",
            PressureLevel::Hpa500 => "500HPA",
            PressureLevel::Hpa200 => "200HPA",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            PressureLevel::Surface => "Surface",
            PressureLevel::Hpa850 => "850 hPa",
            PressureLevel::Hpa700 => "700 hPa",
            PressureLevel::Hpa500 => "500 hPa",
            PressureLevel::Hpa200 => "200 hPa",
        }
    }
}

impl fmt::Display for PressureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for PressureLevel {
    type Err = AdminError;

    /// Accepts database codes case-insensitively ("850HPA", "surface").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        PressureLevel::ALL
            .into_iter()
            .find(|level| level.code() == normalized)
            .ok_or_else(|| AdminError::InvalidLevel(s.to_string()))
    }
}

/// Level attached to an exported map.
///
/// Every pressure level plus the composite upper-air map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapLevel {
    #[serde(rename = "SURFACE")]
    Surface,
    #[serde(rename = "850HPA")]
    Hpa850,
    #[serde(rename = "700HPA")]
    Hpa700,
    #[serde(rename = "500HPA")]
    Hpa500,
    #[serde(rename = "200HPA")]
    Hpa200,
    #[serde(rename = "UPPERAIRMAP")]
    UpperAirMap,
}

impl MapLevel {
    pub const ALL: [MapLevel; 6] = [
        MapLevel::Surface,
        MapLevel::Hpa850,
        MapLevel::Hpa700,
        MapLevel::Hpa500,
        MapLevel::Hpa200,
        MapLevel::UpperAirMap,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            MapLevel::UpperAirMap => "UPPERAIRMAP",
            other => other.pressure_level().map(|l| l.code()).unwrap_or_default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapLevel::UpperAirMap => "Upper Air Map",
            other => other.pressure_level().map(|l| l.label()).unwrap_or_default(),
        }
    }

    /// The single pressure level this map shows, if any.
    pub fn pressure_level(&self) -> Option<PressureLevel> {
        match self {
            MapLevel::Surface => Some(PressureLevel::Surface),
            MapLevel::Hpa850 => Some(PressureLevel::Hpa850),
            MapLevel::Hpa700 => Some(PressureLevel::Hpa700),
            MapLevel::Hpa500 => Some(PressureLevel::Hpa500),
            MapLevel::Hpa200 => Some(PressureLevel::Hpa200),
            MapLevel::UpperAirMap => None,
        }
    }
}

impl From<PressureLevel> for MapLevel {
    fn from(level: PressureLevel) -> Self {
        match level {
            PressureLevel::Surface => MapLevel::Surface,
            PressureLevel::Hpa850 => MapLevel::Hpa850,
            PressureLevel::Hpa700 => MapLevel::Hpa700,
            PressureLevel::Hpa500 => MapLevel::Hpa500,
            PressureLevel::Hpa200 => MapLevel::Hpa200,
        }
    }
}

impl fmt::Display for MapLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for MapLevel {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        MapLevel::ALL
            .into_iter()
            .find(|level| level.code() == normalized)
            .ok_or_else(|| AdminError::InvalidLevel(s.to_string()))
    }
}

/// File format of an exported map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MapType {
    Png,
    Svg,
    Pdf,
    Jpeg,
}

impl MapType {
    pub const ALL: [MapType; 4] = [MapType::Png, MapType::Svg, MapType::Pdf, MapType::Jpeg];

    pub fn code(&self) -> &'static str {
        match self {
            MapType::Png => "PNG",
            MapType::Svg => "SVG",
            MapType::Pdf => "PDF",
            MapType::Jpeg => "JPEG",
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for MapType {
    type Err = AdminError;

    /// Accepts "JPG" as an alias for JPEG.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PNG" => Ok(MapType::Png),
            "SVG" => Ok(MapType::Svg),
            "PDF" => Ok(MapType::Pdf),
            "JPEG" | "JPG" => Ok(MapType::Jpeg),
            _ => Err(AdminError::InvalidMapType(s.to_string())),
        }
    }
}
