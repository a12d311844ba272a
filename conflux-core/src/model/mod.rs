//! Data model for speed conflation
//!
//! Input records ([`SourceRoad`], [`TargetSegment`]) are immutable. Everything
//! else is derived once per conflation run and refers back to its owners by
//! index into the run's input slices.

pub mod result;
pub mod source;
pub mod speed;
pub mod target;

pub use result::{AggregatedMatch, ConflationResult};
pub use source::{SamplePoint, SourceRoad, SourceSubSegment};
pub use speed::{SpeedLimit, SpeedUnit};
pub use target::{PreparedTarget, TargetSegment};
