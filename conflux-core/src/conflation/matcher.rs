use rayon::prelude::*;

use super::ProximityIndex;
use crate::geometry::bearings_agree;
use crate::model::{PreparedTarget, SamplePoint};

/// A sample that lies near a target segment with an agreeing bearing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateMatch {
    pub sample: SamplePoint,
    /// Position of the target in the prepared target slice
    pub target: usize,
    pub distance: f64,
}

/// Matches every sample against the targets within `radius`.
///
/// Candidates whose bearings disagree are dropped; the absence of a candidate
/// is the negative signal. Samples are processed in parallel and the output
/// keeps sample order.
pub fn match_samples(
    samples: &[SamplePoint],
    targets: &[PreparedTarget],
    index: &dyn ProximityIndex,
    radius: f64,
    bearing_tolerance: f64,
) -> Vec<CandidateMatch> {
    samples
        .par_iter()
        .flat_map_iter(|sample| {
            index
                .within_radius(&sample.geometry, radius)
                .into_iter()
                .filter(|(target, _)| {
                    bearings_agree(targets[*target].bearing, sample.bearing, bearing_tolerance)
                })
                .map(|(target, distance)| CandidateMatch {
                    sample: *sample,
                    target,
                    distance,
                })
        })
        .collect()
}
