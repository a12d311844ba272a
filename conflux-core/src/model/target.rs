//! Directional model network segments

use geo::LineString;
use serde_json::{Map, Value as JsonValue};

use crate::geometry::{MetricFrame, Octant, line_bearing, line_length};
use crate::{Bearing, TargetSegmentId};

/// Directional segment of the model network
#[derive(Debug, Clone)]
pub struct TargetSegment {
    /// Externally assigned id, the join key of the output
    pub id: TargetSegmentId,
    pub from_node: Option<String>,
    pub to_node: Option<String>,
    /// Pre-existing speed text, used downstream when conflation yields nothing
    pub fallback_speed: Option<String>,
    /// Attributes passed through untouched
    pub attributes: Map<String, JsonValue>,
    pub geometry: LineString<f64>,
}

/// Per-run view of a [`TargetSegment`] in the metric frame
#[derive(Debug, Clone)]
pub struct PreparedTarget {
    /// Index in the run's target slice
    pub index: usize,
    pub geometry: LineString<f64>,
    pub length: f64,
    pub bearing: Bearing,
    pub octant: Octant,
}

impl PreparedTarget {
    /// Geometry is expected to be validated beforehand; a degenerate line
    /// gets bearing 0.
    pub fn new(index: usize, segment: &TargetSegment, frame: &MetricFrame) -> Self {
        let geometry = frame.to_metric(&segment.geometry);
        let bearing = line_bearing(&geometry).unwrap_or(0.0);
        Self {
            index,
            length: line_length(&geometry),
            octant: Octant::from_bearing(bearing),
            bearing,
            geometry,
        }
    }
}
