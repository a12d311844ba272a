//! The conflation engine: segmentation, sampling, matching and aggregation.
//!
//! Each stage consumes the immutable output of the previous one and returns a
//! new collection. [`conflate`] runs the stages in order.

mod aggregator;
mod config;
mod index;
mod matcher;
mod pipeline;
mod sampler;
mod segmenter;
mod stats;

pub use aggregator::Aggregator;
pub use config::{ConflationConfig, CoordinateFrame, IndexKind};
pub use index::{BruteForceIndex, ProximityIndex, RTreeIndex, build_index};
pub use matcher::{CandidateMatch, match_samples};
pub use pipeline::{ConflationOutput, conflate};
pub use sampler::{SampleIter, sample, sample_all, sample_count};
pub use segmenter::{segment_road, segment_roads};
pub use stats::ConflationStats;
