// Re-export key components
pub use crate::conflation::{
    ConflationConfig, ConflationOutput, ConflationStats, CoordinateFrame, IndexKind, conflate,
};
pub use crate::loading::{SourceFilter, TargetFields, load_source_roads, load_target_segments};
pub use crate::output::{results_to_geojson, write_csv};

// Core records
pub use crate::model::{
    AggregatedMatch, ConflationResult, SourceRoad, SpeedLimit, SpeedUnit, TargetSegment,
};

// Geometry helpers
pub use crate::geometry::{Octant, bearings_agree};

pub use crate::Bearing;
pub use crate::Error;
pub use crate::SourceRoadId;
pub use crate::TargetSegmentId;
