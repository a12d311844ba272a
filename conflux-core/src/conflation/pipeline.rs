use geo::{BoundingRect, ConvexHull, Intersects, LineString, MultiPoint, Rect, coord};
use hashbrown::HashSet;
use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::{
    Aggregator, ConflationConfig, ConflationStats, CoordinateFrame, build_index, match_samples,
    sample_all, segment_roads,
};
use crate::encoding::extract_speed_limit;
use crate::geometry::{LocalProjection, MetricFrame};
use crate::model::{ConflationResult, PreparedTarget, SourceRoad, SpeedLimit, TargetSegment};
use crate::Error;

/// Result of a complete conflation run
#[derive(Debug, Clone)]
pub struct ConflationOutput {
    /// One result per target segment, in input order
    pub results: Vec<ConflationResult>,
    pub stats: ConflationStats,
}

/// Runs the whole conflation: speed extraction, segmentation, sampling,
/// matching and aggregation.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, either collection is
/// empty, a geometry has fewer than two coordinates or a non-finite
/// coordinate, target ids are not unique, geographic input lies outside
/// the longitude/latitude range, or the configured metric CRS cannot be
/// applied. No partial output is produced.
pub fn conflate(
    sources: &[SourceRoad],
    targets: &[TargetSegment],
    config: &ConflationConfig,
) -> Result<ConflationOutput, Error> {
    config.validate()?;
    validate_inputs(sources, targets)?;
    let frame = metric_frame(config.frame, sources, targets)?;
    validate_network_overlap(sources, targets);

    #[cfg(feature = "proj")]
    if let Some(crs) = config.metric_crs.as_deref() {
        let (sources, targets) = reproject_inputs(crs, sources, targets)?;
        return run(&sources, &targets, config, &MetricFrame::Identity);
    }

    run(sources, targets, config, &frame)
}

fn run(
    sources: &[SourceRoad],
    targets: &[TargetSegment],
    config: &ConflationConfig,
    frame: &MetricFrame,
) -> Result<ConflationOutput, Error> {
    info!("Preparing {} target segments", targets.len());
    let prepared: Vec<PreparedTarget> = targets
        .par_iter()
        .enumerate()
        .map(|(idx, target)| PreparedTarget::new(idx, target, frame))
        .collect();

    info!("Extracting speed limits from {} source roads", sources.len());
    let speeds = extract_speeds(sources, config);
    let roads_without_speed = speeds.iter().filter(|speed| speed.is_none()).count();
    if roads_without_speed == sources.len() {
        warn!("No source road carries a usable speed limit - every target will stay unmatched");
    }

    let sub_segments = segment_roads(sources, &speeds, frame);
    info!(
        "Split {} roads with speed limits into {} sub-segments",
        sources.len() - roads_without_speed,
        sub_segments.len()
    );

    let samples = sample_all(&sub_segments, config.sample_step);
    info!(
        "Sampled {} points every {} m",
        samples.len(),
        config.sample_step
    );

    let index = build_index(config.index, &prepared);
    let candidates = match_samples(
        &samples,
        &prepared,
        index.as_ref(),
        config.search_radius,
        config.bearing_tolerance,
    );
    info!(
        "Found {} candidate matches within {} m and {} degrees",
        candidates.len(),
        config.search_radius,
        config.bearing_tolerance
    );

    let results = Aggregator {
        sources,
        sub_segments: &sub_segments,
        targets,
        prepared: &prepared,
        sample_step: config.sample_step,
        min_match_percentage: config.min_match_percentage,
    }
    .aggregate(&candidates);

    let mut stats = ConflationStats {
        source_roads: sources.len(),
        roads_without_speed,
        sub_segments: sub_segments.len(),
        samples: samples.len(),
        candidates: candidates.len(),
        ..ConflationStats::default()
    };
    stats.record_results(&results);

    info!("Conflation finished");
    Ok(ConflationOutput { results, stats })
}

fn extract_speeds(sources: &[SourceRoad], config: &ConflationConfig) -> Vec<Option<SpeedLimit>> {
    sources
        .par_iter()
        .map(|road| {
            let speed = road
                .speed_limits
                .as_deref()
                .and_then(extract_speed_limit)
                .map(|limit| match config.speed_unit {
                    Some(unit) => limit.in_unit(unit),
                    None => limit,
                });
            if speed.is_none() {
                trace!("Road {} has no usable speed limit - excluded", road.id);
            }
            speed
        })
        .collect()
}

fn validate_inputs(sources: &[SourceRoad], targets: &[TargetSegment]) -> Result<(), Error> {
    if sources.is_empty() {
        return Err(Error::MissingInput("source road collection is empty"));
    }
    if targets.is_empty() {
        return Err(Error::MissingInput("target segment collection is empty"));
    }

    for road in sources {
        validate_geometry("source road", &road.id, &road.geometry)?;
    }

    let mut seen = HashSet::with_capacity(targets.len());
    for target in targets {
        validate_geometry("target segment", &target.id, &target.geometry)?;
        if !seen.insert(target.id.as_str()) {
            return Err(Error::DuplicateTargetId(target.id.clone()));
        }
    }

    Ok(())
}

fn validate_geometry(kind: &'static str, id: &str, line: &LineString<f64>) -> Result<(), Error> {
    if line.0.len() < 2 {
        return Err(Error::EmptyGeometry {
            kind,
            id: id.to_string(),
        });
    }
    if line.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(Error::NonFiniteCoordinate {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn metric_frame(
    frame: CoordinateFrame,
    sources: &[SourceRoad],
    targets: &[TargetSegment],
) -> Result<MetricFrame, Error> {
    match frame {
        CoordinateFrame::Projected => Ok(MetricFrame::Identity),
        CoordinateFrame::Geographic => {
            let extent = joint_extent(sources, targets)
                .ok_or(Error::MissingInput("no geometry to derive a projection from"))?;
            let (min, max) = (extent.min(), extent.max());
            if min.x < -180.0 || max.x > 180.0 || min.y < -90.0 || max.y > 90.0 {
                return Err(Error::InvalidData(format!(
                    "coordinates span ({}, {})..({}, {}) which is not longitude/latitude; \
                     use the projected frame for metric input",
                    min.x, min.y, max.x, max.y
                )));
            }
            let projection = LocalProjection::centered_on(extent);
            debug!(
                "Reprojecting to a local metric frame around {:?}",
                projection.origin()
            );
            Ok(MetricFrame::Local(projection))
        }
    }
}

#[cfg(feature = "proj")]
fn reproject_inputs(
    crs: &str,
    sources: &[SourceRoad],
    targets: &[TargetSegment],
) -> Result<(Vec<SourceRoad>, Vec<TargetSegment>), Error> {
    let transform = crate::geometry::CrsTransform::from_lon_lat(crs)?;
    debug!("Reprojecting input to {crs} through PROJ");

    let sources = sources
        .iter()
        .map(|road| {
            Ok(SourceRoad {
                geometry: transform.transform(&road.geometry)?,
                ..road.clone()
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let targets = targets
        .iter()
        .map(|target| {
            Ok(TargetSegment {
                geometry: transform.transform(&target.geometry)?,
                ..target.clone()
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok((sources, targets))
}

fn joint_extent(sources: &[SourceRoad], targets: &[TargetSegment]) -> Option<Rect<f64>> {
    sources
        .iter()
        .map(|road| &road.geometry)
        .chain(targets.iter().map(|target| &target.geometry))
        .filter_map(|line| line.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            )
        })
}

#[allow(clippy::cast_precision_loss)]
fn validate_network_overlap(sources: &[SourceRoad], targets: &[TargetSegment]) {
    let source_points: MultiPoint = sources
        .iter()
        .flat_map(|road| road.geometry.points())
        .collect();
    let source_hull = source_points.convex_hull();

    let targets_outside_hull = targets
        .iter()
        .filter(|target| !target.geometry.intersects(&source_hull))
        .count();

    if targets_outside_hull > 0 {
        let percentage = (targets_outside_hull as f64 / targets.len() as f64) * 100.0;
        warn!(
            "{targets_outside_hull} of {} target segments ({percentage:.1}%) are outside \
        the source network coverage area. These segments cannot receive a speed. \
        Consider using a larger source extract that covers the whole model network.",
            targets.len()
        );
    }
}
