use std::hint::black_box;

use conflux_core::conflation::{
    Aggregator, RTreeIndex, match_samples, sample_all, segment_roads,
};
use conflux_core::geometry::MetricFrame;
use conflux_core::model::PreparedTarget;
use conflux_core::{
    ConflationConfig, CoordinateFrame, SourceRoad, SpeedLimit, SpeedUnit, TargetSegment, conflate,
};
use criterion::{Criterion, criterion_group, criterion_main};
use geo::line_string;
use serde_json::Map;

const BLOCK: f64 = 120.0;
const OFFSET: f64 = 4.0;

/// Square street grid: one centerline per street and two directional
/// carriageways offset to either side
fn grid(size: usize) -> (Vec<SourceRoad>, Vec<TargetSegment>) {
    let span = BLOCK * size as f64;
    let mut sources = Vec::new();
    let mut targets = Vec::new();

    for i in 0..=size {
        let at = BLOCK * i as f64;
        let streets = [
            (
                format!("h{i}"),
                line_string![(x: 0.0, y: at), (x: span, y: at)],
                line_string![(x: 0.0, y: at - OFFSET), (x: span, y: at - OFFSET)],
                line_string![(x: span, y: at + OFFSET), (x: 0.0, y: at + OFFSET)],
            ),
            (
                format!("v{i}"),
                line_string![(x: at, y: 0.0), (x: at, y: span)],
                line_string![(x: at + OFFSET, y: 0.0), (x: at + OFFSET, y: span)],
                line_string![(x: at - OFFSET, y: span), (x: at - OFFSET, y: 0.0)],
            ),
        ];
        for (id, centerline, forward, backward) in streets {
            sources.push(SourceRoad {
                id: id.clone(),
                class: Some("residential".into()),
                speed_limits: Some(format!(
                    r#"[{{"max_speed": {{"value": {}, "unit": "mph"}}}}]"#,
                    25 + 5 * (i % 4)
                )),
                connectors: Some("[0.0, 0.25, 0.5, 0.75, 1.0]".into()),
                geometry: centerline,
            });
            for (suffix, geometry) in [("f", forward), ("b", backward)] {
                targets.push(TargetSegment {
                    id: format!("{id}{suffix}"),
                    from_node: None,
                    to_node: None,
                    fallback_speed: None,
                    attributes: Map::new(),
                    geometry,
                });
            }
        }
    }
    (sources, targets)
}

fn bench_conflation(c: &mut Criterion) {
    let (sources, targets) = grid(20);
    let config = ConflationConfig {
        frame: CoordinateFrame::Projected,
        ..Default::default()
    };

    let frame = MetricFrame::Identity;
    let speeds: Vec<Option<SpeedLimit>> = sources
        .iter()
        .map(|_| Some(SpeedLimit::new(25.0, Some(SpeedUnit::Mph))))
        .collect();
    let sub_segments = segment_roads(&sources, &speeds, &frame);
    let samples = sample_all(&sub_segments, config.sample_step);
    let prepared: Vec<PreparedTarget> = targets
        .iter()
        .enumerate()
        .map(|(idx, target)| PreparedTarget::new(idx, target, &frame))
        .collect();
    let index = RTreeIndex::new(&prepared);

    c.bench_function("sample_all", |b| {
        b.iter(|| sample_all(black_box(&sub_segments), config.sample_step));
    });

    c.bench_function("match_samples", |b| {
        b.iter(|| {
            match_samples(
                black_box(&samples),
                &prepared,
                &index,
                config.search_radius,
                config.bearing_tolerance,
            )
        });
    });

    let candidates = match_samples(
        &samples,
        &prepared,
        &index,
        config.search_radius,
        config.bearing_tolerance,
    );
    let aggregator = Aggregator {
        sources: &sources,
        sub_segments: &sub_segments,
        targets: &targets,
        prepared: &prepared,
        sample_step: config.sample_step,
        min_match_percentage: config.min_match_percentage,
    };
    c.bench_function("aggregate", |b| {
        b.iter(|| aggregator.aggregate(black_box(&candidates)));
    });

    c.bench_function("conflate_grid_20", |b| {
        b.iter(|| conflate(black_box(&sources), black_box(&targets), &config));
    });
}

criterion_group!(benches, bench_conflation);
criterion_main!(benches);
