//! Source network records and the artifacts derived from them

use geo::{LineString, Point};

use crate::geometry::Octant;
use crate::model::SpeedLimit;
use crate::{Bearing, SourceRoadId};

/// Road centerline from the source network
#[derive(Debug, Clone)]
pub struct SourceRoad {
    pub id: SourceRoadId,
    /// Road class tag, informational only
    pub class: Option<String>,
    /// Raw speed-limit encoding as found in the source data
    pub speed_limits: Option<String>,
    /// Raw connector encoding (linear references of internal break points)
    pub connectors: Option<String>,
    pub geometry: LineString<f64>,
}

/// Piece of a [`SourceRoad`] between two consecutive connectors
#[derive(Debug, Clone)]
pub struct SourceSubSegment {
    /// `<parent id>_<ordinal>`, ordinals start at 1
    pub id: String,
    /// Index of the owning road in the run's source slice
    pub parent: usize,
    pub class: Option<String>,
    pub speed: SpeedLimit,
    pub start_fraction: f64,
    pub end_fraction: f64,
    /// Substring geometry in the metric frame
    pub geometry: LineString<f64>,
    pub length: f64,
    pub bearing: Bearing,
    pub octant: Octant,
}

/// Point sampled along a [`SourceSubSegment`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Position of the sample within its sub-segment
    pub sequence: usize,
    /// Index of the owning sub-segment
    pub sub_segment: usize,
    /// Index of the owning source road
    pub parent: usize,
    pub bearing: Bearing,
    pub octant: Octant,
    pub geometry: Point<f64>,
}
