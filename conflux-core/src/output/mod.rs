//! Writing conflation results as CSV rows or GeoJSON features

mod features;
mod records;

pub use features::{results_to_geojson, results_to_geojson_string};
pub use records::{OutputRecord, write_csv};

use crate::Error;
use crate::model::{ConflationResult, TargetSegment};

fn target_of<'a>(
    result: &ConflationResult,
    targets: &'a [TargetSegment],
) -> Result<&'a TargetSegment, Error> {
    targets
        .get(result.target_index)
        .filter(|target| target.id == result.target_id)
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "result for '{}' does not belong to the given target network",
                result.target_id
            ))
        })
}
