//! Speed-limit conflation between a source road network and a directional
//! model network.
//!
//! The source network carries one centerline per physical road together with
//! posted speed limits. The model (target) network has one segment per
//! direction of travel. Conflation samples the source centerlines densely,
//! matches every sample to nearby target segments whose bearing agrees and
//! assigns each target segment the speed of the source road that contributed
//! most of its matches.

pub mod conflation;
pub mod encoding;
mod error;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod output;
pub mod prelude;

pub use conflation::{
    ConflationConfig, ConflationOutput, ConflationStats, CoordinateFrame, IndexKind, conflate,
};
pub use error::Error;
pub use model::{
    AggregatedMatch, ConflationResult, SourceRoad, SourceSubSegment, SpeedLimit, SpeedUnit,
    TargetSegment,
};

/// Default distance between consecutive samples along a source line, in metres
pub const DEFAULT_SAMPLE_STEP: f64 = 4.0;

/// Default proximity radius between a sample and a target segment, in metres
pub const DEFAULT_SEARCH_RADIUS: f64 = 10.0;

/// Default bearing tolerance, in degrees
pub const DEFAULT_BEARING_TOLERANCE: f64 = 20.0;

/// Default minimum match percentage for a speed to be assigned
pub const DEFAULT_MIN_MATCH_PERCENTAGE: f64 = 25.0;

/// Identifier of a road in the source network
pub type SourceRoadId = String;

/// Identifier of a segment in the target network
pub type TargetSegmentId = String;

/// Compass bearing in degrees, clockwise from north, in `[0, 360)`
pub type Bearing = f64;
