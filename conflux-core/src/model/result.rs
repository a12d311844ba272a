//! Conflation output records

use serde::Serialize;

use crate::encoding::parse_fallback_speed;
use crate::geometry::Octant;
use crate::model::{SpeedUnit, TargetSegment};
use crate::{Bearing, SourceRoadId, TargetSegmentId};

/// Matches between one target segment and one source road
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedMatch {
    pub source_id: SourceRoadId,
    pub source_class: Option<String>,
    pub speed: f64,
    pub speed_unit: Option<SpeedUnit>,
    /// Samples of this road matched to this target
    pub point_count: usize,
    /// Samples of this road matched to any target
    pub total_point_count: usize,
    /// `100 * point_count / total_point_count`
    pub percentage: f64,
    /// Bearing of the sub-segment that contributed most of the samples
    pub source_bearing: Bearing,
    pub source_octant: Octant,
    pub target_bearing: Bearing,
    pub target_octant: Octant,
    pub mean_distance: f64,
}

/// Outcome of conflation for a single target segment
#[derive(Debug, Clone, PartialEq)]
pub struct ConflationResult {
    pub target_id: TargetSegmentId,
    /// Index of the target in the run's input slice
    pub target_index: usize,
    pub best_match: Option<AggregatedMatch>,
    /// Theoretical sample count for the target's length
    pub total_possible: usize,
    /// `100 * point_count / total_possible`
    pub coverage: f64,
    pub accepted: bool,
}

impl ConflationResult {
    pub fn unmatched(
        target_id: TargetSegmentId,
        target_index: usize,
        total_possible: usize,
    ) -> Self {
        Self {
            target_id,
            target_index,
            best_match: None,
            total_possible,
            coverage: 0.0,
            accepted: false,
        }
    }

    /// Conflated speed, only present for accepted matches
    pub fn speed(&self) -> Option<f64> {
        self.best_match
            .as_ref()
            .filter(|_| self.accepted)
            .map(|m| m.speed)
    }

    pub fn point_count(&self) -> usize {
        self.best_match.as_ref().map_or(0, |m| m.point_count)
    }

    pub fn total_point_count(&self) -> usize {
        self.best_match.as_ref().map_or(0, |m| m.total_point_count)
    }

    pub fn percentage(&self) -> f64 {
        self.best_match.as_ref().map_or(0.0, |m| m.percentage)
    }

    /// Speed the downstream classifier should use: the conflated value when
    /// there is one, otherwise the target's own fallback attribute.
    pub fn effective_speed(&self, target: &TargetSegment) -> Option<f64> {
        self.speed().or_else(|| {
            target
                .fallback_speed
                .as_deref()
                .and_then(parse_fallback_speed)
        })
    }
}
