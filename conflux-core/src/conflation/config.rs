use serde::{Deserialize, Serialize};

use crate::model::SpeedUnit;
use crate::{
    DEFAULT_BEARING_TOLERANCE, DEFAULT_MIN_MATCH_PERCENTAGE, DEFAULT_SAMPLE_STEP,
    DEFAULT_SEARCH_RADIUS, Error,
};

/// Coordinate frame of the input geometries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Longitude/latitude in degrees, reprojected to metres for the run
    #[default]
    Geographic,
    /// Already in a metric projection
    Projected,
}

/// Spatial index used to find target segments near a sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    #[default]
    Rtree,
    /// Compares every sample with every target; only for small inputs
    BruteForce,
}

/// Parameters of a conflation run. Distances are in metres, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConflationConfig {
    /// Distance between consecutive samples along a source line
    pub sample_step: f64,
    /// Maximum distance between a sample and a matched target segment
    pub search_radius: f64,
    /// Maximum bearing difference, applied in both travel directions
    pub bearing_tolerance: f64,
    /// Share of a source road's matched samples a target must receive
    pub min_match_percentage: f64,
    pub frame: CoordinateFrame,
    pub index: IndexKind,
    /// Convert every extracted speed into this unit
    pub speed_unit: Option<SpeedUnit>,
    /// PROJ definition of a metric CRS for geographic input, e.g. `EPSG:32618`.
    /// Needs the `proj` feature; without it the local frame is used.
    pub metric_crs: Option<String>,
}

impl Default for ConflationConfig {
    fn default() -> Self {
        Self {
            sample_step: DEFAULT_SAMPLE_STEP,
            search_radius: DEFAULT_SEARCH_RADIUS,
            bearing_tolerance: DEFAULT_BEARING_TOLERANCE,
            min_match_percentage: DEFAULT_MIN_MATCH_PERCENTAGE,
            frame: CoordinateFrame::default(),
            index: IndexKind::default(),
            speed_unit: None,
            metric_crs: None,
        }
    }
}

impl ConflationConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for non-positive distances or angles,
    /// percentages outside their ranges, and a metric CRS that cannot apply
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.sample_step.is_finite() && self.sample_step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "sample_step must be positive, got {}",
                self.sample_step
            )));
        }
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "search_radius must be positive, got {}",
                self.search_radius
            )));
        }
        if !(0.0..=180.0).contains(&self.bearing_tolerance) {
            return Err(Error::InvalidConfig(format!(
                "bearing_tolerance must be within [0, 180], got {}",
                self.bearing_tolerance
            )));
        }
        if !(0.0..=100.0).contains(&self.min_match_percentage) {
            return Err(Error::InvalidConfig(format!(
                "min_match_percentage must be within [0, 100], got {}",
                self.min_match_percentage
            )));
        }
        if let Some(crs) = &self.metric_crs {
            if self.frame != CoordinateFrame::Geographic {
                return Err(Error::InvalidConfig(format!(
                    "metric_crs '{crs}' only applies to the geographic frame"
                )));
            }
            if !cfg!(feature = "proj") {
                return Err(Error::InvalidConfig(format!(
                    "metric_crs '{crs}' needs conflux built with the `proj` feature"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConflationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sample_step, 4.0);
        assert_eq!(config.search_radius, 10.0);
        assert_eq!(config.bearing_tolerance, 20.0);
        assert_eq!(config.min_match_percentage, 25.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            ConflationConfig {
                sample_step: 0.0,
                ..Default::default()
            },
            ConflationConfig {
                search_radius: f64::NAN,
                ..Default::default()
            },
            ConflationConfig {
                bearing_tolerance: 200.0,
                ..Default::default()
            },
            ConflationConfig {
                min_match_percentage: -1.0,
                ..Default::default()
            },
            ConflationConfig {
                frame: CoordinateFrame::Projected,
                metric_crs: Some("EPSG:32618".into()),
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[cfg(not(feature = "proj"))]
    #[test]
    fn test_metric_crs_needs_proj_feature() {
        let config = ConflationConfig {
            metric_crs: Some("EPSG:32618".into()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ConflationConfig = serde_json::from_str(
            r#"{"sample_step": 2.5, "frame": "projected", "index": "brute_force", "speed_unit": "km/h"}"#,
        )
        .unwrap();
        assert_eq!(config.sample_step, 2.5);
        assert_eq!(config.frame, CoordinateFrame::Projected);
        assert_eq!(config.index, IndexKind::BruteForce);
        assert_eq!(config.speed_unit, Some(SpeedUnit::Kmh));
        assert_eq!(config.search_radius, 10.0);
        assert_eq!(config.metric_crs, None);
    }
}
