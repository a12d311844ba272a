use std::io::Write;

use serde::Serialize;

use super::target_of;
use crate::Error;
use crate::geometry::Octant;
use crate::model::{ConflationResult, SpeedUnit, TargetSegment};

/// Flat output row for one target segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord<'a> {
    pub target_id: &'a str,
    pub from_node: Option<&'a str>,
    pub to_node: Option<&'a str>,
    /// Conflated speed, empty unless accepted
    pub speed: Option<f64>,
    pub speed_unit: Option<SpeedUnit>,
    pub source_id: Option<&'a str>,
    pub source_class: Option<&'a str>,
    pub point_count: usize,
    pub total_point_count: usize,
    pub percentage: f64,
    pub total_possible: usize,
    pub coverage: f64,
    pub accepted: bool,
    pub source_octant: Option<Octant>,
    pub target_octant: Option<Octant>,
    pub mean_distance: Option<f64>,
    /// Conflated speed, or the parsed fallback attribute
    pub effective_speed: Option<f64>,
}

impl<'a> OutputRecord<'a> {
    pub fn new(result: &'a ConflationResult, target: &'a TargetSegment) -> Self {
        let best = result.best_match.as_ref();
        Self {
            target_id: &result.target_id,
            from_node: target.from_node.as_deref(),
            to_node: target.to_node.as_deref(),
            speed: result.speed(),
            speed_unit: result
                .speed()
                .and_then(|_| best.and_then(|m| m.speed_unit)),
            source_id: best.map(|m| m.source_id.as_str()),
            source_class: best.and_then(|m| m.source_class.as_deref()),
            point_count: result.point_count(),
            total_point_count: result.total_point_count(),
            percentage: result.percentage(),
            total_possible: result.total_possible,
            coverage: result.coverage,
            accepted: result.accepted,
            source_octant: best.map(|m| m.source_octant),
            target_octant: best.map(|m| m.target_octant),
            mean_distance: best.map(|m| m.mean_distance),
            effective_speed: result.effective_speed(target),
        }
    }
}

/// Writes one CSV row per result, in result order
pub fn write_csv<W: Write>(
    writer: W,
    results: &[ConflationResult],
    targets: &[TargetSegment],
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for result in results {
        writer.serialize(OutputRecord::new(result, target_of(result, targets)?))?;
    }
    writer.flush()?;
    Ok(())
}
