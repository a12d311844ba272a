use geo::LineString;
use itertools::Itertools;
use log::trace;
use rayon::prelude::*;

use crate::encoding::parse_connector_fractions;
use crate::geometry::{MetricFrame, Octant, line_bearing, line_length, split};
use crate::model::{SourceRoad, SourceSubSegment, SpeedLimit};

/// Splits one road at its internal connectors.
///
/// `geometry` is the road geometry already in the metric frame. With fewer
/// than two connector fractions the whole geometry becomes a single piece.
/// Pieces of zero length are dropped, so two connectors at the same position
/// leave the road with no pieces at all.
pub fn segment_road(
    parent: usize,
    road: &SourceRoad,
    geometry: &LineString<f64>,
    speed: SpeedLimit,
) -> Vec<SourceSubSegment> {
    let fractions = road
        .connectors
        .as_deref()
        .map(parse_connector_fractions)
        .unwrap_or_default();

    if fractions.len() < 2 {
        return vec![sub_segment(parent, road, 1, (0.0, 1.0), geometry.clone(), speed)];
    }

    fractions
        .into_iter()
        .tuple_windows()
        .filter_map(|(start, end)| {
            let piece = split(geometry, start, end);
            if line_length(&piece) > 0.0 {
                Some(((start, end), piece))
            } else {
                trace!("Dropping zero-length piece {start}..{end} of road {}", road.id);
                None
            }
        })
        .enumerate()
        .map(|(ordinal, (range, piece))| {
            sub_segment(parent, road, ordinal + 1, range, piece, speed)
        })
        .collect()
}

fn sub_segment(
    parent: usize,
    road: &SourceRoad,
    ordinal: usize,
    (start_fraction, end_fraction): (f64, f64),
    geometry: LineString<f64>,
    speed: SpeedLimit,
) -> SourceSubSegment {
    let bearing = line_bearing(&geometry).unwrap_or(0.0);
    SourceSubSegment {
        id: format!("{}_{ordinal}", road.id),
        parent,
        class: road.class.clone(),
        speed,
        start_fraction,
        end_fraction,
        length: line_length(&geometry),
        bearing,
        octant: Octant::from_bearing(bearing),
        geometry,
    }
}

/// Segments every road that has a speed, in parallel.
///
/// `speeds[i]` belongs to `roads[i]`; roads without a speed produce nothing.
/// Output order follows road order.
pub fn segment_roads(
    roads: &[SourceRoad],
    speeds: &[Option<SpeedLimit>],
    frame: &MetricFrame,
) -> Vec<SourceSubSegment> {
    (0..roads.len())
        .into_par_iter()
        .filter_map(|idx| speeds.get(idx).copied().flatten().map(|speed| (idx, speed)))
        .flat_map_iter(|(idx, speed)| {
            let road = &roads[idx];
            segment_road(idx, road, &frame.to_metric(&road.geometry), speed)
        })
        .collect()
}
