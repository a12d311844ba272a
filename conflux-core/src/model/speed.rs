use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const KMH_PER_MPH: f64 = 1.609_344;

/// Unit of a posted speed limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "mph")]
    Mph,
    #[serde(rename = "km/h", alias = "kmh", alias = "kph")]
    Kmh,
}

impl SpeedUnit {
    pub fn convert(self, value: f64, into: SpeedUnit) -> f64 {
        match (self, into) {
            (SpeedUnit::Mph, SpeedUnit::Kmh) => value * KMH_PER_MPH,
            (SpeedUnit::Kmh, SpeedUnit::Mph) => value / KMH_PER_MPH,
            _ => value,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mph" => Ok(SpeedUnit::Mph),
            "km/h" | "kmh" | "kph" => Ok(SpeedUnit::Kmh),
            other => Err(format!("unknown speed unit '{other}'")),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::Mph => f.write_str("mph"),
            SpeedUnit::Kmh => f.write_str("km/h"),
        }
    }
}

/// Numeric speed limit extracted from a source road
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedLimit {
    pub value: f64,
    /// `None` when the encoding carried no unit
    pub unit: Option<SpeedUnit>,
}

impl SpeedLimit {
    pub fn new(value: f64, unit: Option<SpeedUnit>) -> Self {
        Self { value, unit }
    }

    /// Express the limit in `unit`; limits without a unit are taken as-is
    #[must_use]
    pub fn in_unit(self, unit: SpeedUnit) -> Self {
        match self.unit {
            Some(from) => Self::new(from.convert(self.value, unit), Some(unit)),
            None => self,
        }
    }
}
