use std::cmp::Ordering;

use hashbrown::HashMap;

use super::CandidateMatch;
use crate::model::{
    AggregatedMatch, ConflationResult, PreparedTarget, SourceRoad, SourceSubSegment, TargetSegment,
};

/// Matched samples of one source road on one target segment
#[derive(Debug, Default)]
struct PairTally {
    points: usize,
    distance_sum: f64,
    by_sub_segment: HashMap<usize, usize>,
}

impl PairTally {
    fn add(&mut self, candidate: &CandidateMatch) {
        self.points += 1;
        self.distance_sum += candidate.distance;
        *self
            .by_sub_segment
            .entry(candidate.sample.sub_segment)
            .or_default() += 1;
    }

    /// Sub-segment that contributed most samples, lowest index on ties
    fn dominant_sub_segment(&self) -> Option<usize> {
        self.by_sub_segment
            .iter()
            .max_by(|(a_idx, a_count), (b_idx, b_count)| {
                a_count.cmp(b_count).then_with(|| b_idx.cmp(a_idx))
            })
            .map(|(idx, _)| *idx)
    }
}

/// Turns candidate matches into one [`ConflationResult`] per target segment
pub struct Aggregator<'a> {
    pub sources: &'a [SourceRoad],
    pub sub_segments: &'a [SourceSubSegment],
    pub targets: &'a [TargetSegment],
    pub prepared: &'a [PreparedTarget],
    pub sample_step: f64,
    pub min_match_percentage: f64,
}

impl Aggregator<'_> {
    /// Counts matches per (target, source road), picks the road with the most
    /// local matches for every target and applies the acceptance threshold.
    ///
    /// The output has one entry per prepared target, in target order.
    pub fn aggregate(&self, candidates: &[CandidateMatch]) -> Vec<ConflationResult> {
        let mut pairs: HashMap<(usize, usize), PairTally> = HashMap::new();
        let mut grand_totals: HashMap<usize, usize> = HashMap::new();

        for candidate in candidates {
            let parent = candidate.sample.parent;
            pairs
                .entry((candidate.target, parent))
                .or_default()
                .add(candidate);
            *grand_totals.entry(parent).or_default() += 1;
        }

        let mut per_target: HashMap<usize, Vec<AggregatedMatch>> = HashMap::new();
        for ((target, parent), tally) in &pairs {
            let grand_total = grand_totals.get(parent).copied().unwrap_or(tally.points);
            if let Some(aggregated) = self.aggregated_match(*target, *parent, tally, grand_total) {
                per_target.entry(*target).or_default().push(aggregated);
            }
        }

        self.prepared
            .iter()
            .enumerate()
            .map(|(position, prepared)| {
                let best = per_target
                    .remove(&position)
                    .and_then(|matches| matches.into_iter().max_by(rank));
                self.result_for(prepared, best)
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn aggregated_match(
        &self,
        target: usize,
        parent: usize,
        tally: &PairTally,
        grand_total: usize,
    ) -> Option<AggregatedMatch> {
        let road = self.sources.get(parent)?;
        let sub_segment = self.sub_segments.get(tally.dominant_sub_segment()?)?;
        let prepared = self.prepared.get(target)?;

        Some(AggregatedMatch {
            source_id: road.id.clone(),
            source_class: road.class.clone(),
            speed: sub_segment.speed.value,
            speed_unit: sub_segment.speed.unit,
            point_count: tally.points,
            total_point_count: grand_total,
            percentage: percentage(tally.points, grand_total),
            source_bearing: sub_segment.bearing,
            source_octant: sub_segment.octant,
            target_bearing: prepared.bearing,
            target_octant: prepared.octant,
            mean_distance: tally.distance_sum / tally.points as f64,
        })
    }

    fn result_for(
        &self,
        prepared: &PreparedTarget,
        best: Option<AggregatedMatch>,
    ) -> ConflationResult {
        let target_id = self.targets[prepared.index].id.clone();
        let total_possible = total_possible_samples(prepared.length, self.sample_step);

        match best {
            Some(best) => ConflationResult {
                target_id,
                target_index: prepared.index,
                coverage: percentage(best.point_count, total_possible),
                accepted: best.percentage >= self.min_match_percentage,
                best_match: Some(best),
                total_possible,
            },
            None => ConflationResult::unmatched(target_id, prepared.index, total_possible),
        }
    }
}

/// Winner order: more local points, then a higher percentage, then the
/// smaller source id. `max_by` with this order picks the winner.
fn rank(a: &AggregatedMatch, b: &AggregatedMatch) -> Ordering {
    a.point_count
        .cmp(&b.point_count)
        .then_with(|| a.percentage.total_cmp(&b.percentage))
        .then_with(|| b.source_id.cmp(&a.source_id))
}

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Samples a target of `length` could receive: `round(length / step)`, at least 1
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn total_possible_samples(length: f64, step: f64) -> usize {
    ((length / step).round().max(0.0) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{LineString, line_string, point};
    use serde_json::Map;

    use crate::geometry::{MetricFrame, Octant, line_length};
    use crate::model::{SamplePoint, SpeedLimit, SpeedUnit};

    struct Fixture {
        sources: Vec<SourceRoad>,
        sub_segments: Vec<SourceSubSegment>,
        targets: Vec<TargetSegment>,
        prepared: Vec<PreparedTarget>,
    }

    impl Fixture {
        /// One sub-segment per road; `roads` are (id, speed)
        fn new(roads: &[(&str, f64)], target_lines: Vec<LineString<f64>>) -> Self {
            let sources: Vec<SourceRoad> = roads
                .iter()
                .map(|(id, _)| SourceRoad {
                    id: (*id).to_string(),
                    class: Some("residential".into()),
                    speed_limits: None,
                    connectors: None,
                    geometry: line_string![(x: 0.0, y: 0.0), (x: 40.0, y: 0.0)],
                })
                .collect();
            let sub_segments = sources
                .iter()
                .zip(roads)
                .enumerate()
                .map(|(idx, (road, (_, speed)))| SourceSubSegment {
                    id: format!("{}_1", road.id),
                    parent: idx,
                    class: road.class.clone(),
                    speed: SpeedLimit::new(*speed, Some(SpeedUnit::Mph)),
                    start_fraction: 0.0,
                    end_fraction: 1.0,
                    length: line_length(&road.geometry),
                    bearing: 92.0,
                    octant: Octant::E,
                    geometry: road.geometry.clone(),
                })
                .collect();
            let targets: Vec<TargetSegment> = target_lines
                .into_iter()
                .enumerate()
                .map(|(idx, geometry)| TargetSegment {
                    id: format!("t{idx}"),
                    from_node: None,
                    to_node: None,
                    fallback_speed: None,
                    attributes: Map::new(),
                    geometry,
                })
                .collect();
            let prepared = targets
                .iter()
                .enumerate()
                .map(|(idx, t)| PreparedTarget::new(idx, t, &MetricFrame::Identity))
                .collect();
            Self {
                sources,
                sub_segments,
                targets,
                prepared,
            }
        }

        fn aggregator(&self) -> Aggregator<'_> {
            Aggregator {
                sources: &self.sources,
                sub_segments: &self.sub_segments,
                targets: &self.targets,
                prepared: &self.prepared,
                sample_step: 4.0,
                min_match_percentage: 25.0,
            }
        }
    }

    /// `count` candidates of road `parent` on target `target`
    fn candidates(parent: usize, target: usize, count: usize) -> Vec<CandidateMatch> {
        (0..count)
            .map(|sequence| CandidateMatch {
                sample: SamplePoint {
                    sequence,
                    sub_segment: parent,
                    parent,
                    bearing: 92.0,
                    octant: Octant::E,
                    geometry: point!(x: 0.0, y: 0.0),
                },
                target,
                distance: 2.0,
            })
            .collect()
    }

    fn east(y: f64) -> LineString<f64> {
        line_string![(x: 0.0, y: y), (x: 40.0, y: y)]
    }

    #[test]
    fn test_accepted_match() {
        let fixture = Fixture::new(&[("road", 25.0)], vec![east(0.0), east(500.0)]);
        let mut all = candidates(0, 0, 9);
        all.extend(candidates(0, 1, 1));

        let results = fixture.aggregator().aggregate(&all);
        let result = &results[0];
        let best = result.best_match.as_ref().unwrap();
        assert_eq!(best.point_count, 9);
        assert_eq!(best.total_point_count, 10);
        assert_relative_eq!(best.percentage, 90.0);
        assert_eq!(result.total_possible, 10);
        // local count 9, not the road's total of 10
        assert_relative_eq!(result.coverage, 90.0);
        assert!(result.accepted);
        assert_eq!(result.speed(), Some(25.0));
        assert_relative_eq!(best.mean_distance, 2.0);
        assert_eq!(best.target_octant, Octant::E);
    }

    #[test]
    fn test_below_threshold_withholds_speed() {
        let fixture = Fixture::new(&[("road", 25.0)], vec![east(0.0), east(500.0)]);
        let mut all = candidates(0, 0, 2);
        all.extend(candidates(0, 1, 8));

        let results = fixture.aggregator().aggregate(&all);
        assert_relative_eq!(results[0].percentage(), 20.0);
        assert!(!results[0].accepted);
        assert_eq!(results[0].speed(), None);
        assert_eq!(results[1].speed(), Some(25.0));
    }

    #[test]
    fn test_local_count_beats_global_popularity() {
        let fixture = Fixture::new(
            &[("A", 25.0), ("B", 40.0)],
            vec![east(0.0), east(500.0)],
        );
        let mut all = candidates(0, 0, 6);
        all.extend(candidates(1, 0, 4));
        all.extend(candidates(1, 1, 16));

        let results = fixture.aggregator().aggregate(&all);
        let best = results[0].best_match.as_ref().unwrap();
        assert_eq!(best.source_id, "A");
        assert_eq!(best.point_count, 6);
        assert_eq!(best.total_point_count, 6);
        assert_eq!(results[0].speed(), Some(25.0));
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let fixture = Fixture::new(
            &[("B", 40.0), ("A", 25.0), ("C", 30.0)],
            vec![east(0.0), east(500.0)],
        );
        // B and A tie locally; A is more concentrated on this target
        let mut all = candidates(0, 0, 5);
        all.extend(candidates(0, 1, 5));
        all.extend(candidates(1, 0, 5));
        all.extend(candidates(2, 0, 5));
        all.extend(candidates(2, 1, 5));

        let results = fixture.aggregator().aggregate(&all);
        assert_eq!(results[0].best_match.as_ref().unwrap().source_id, "A");

        // B and C tie on count and percentage; the smaller id wins
        let without_a: Vec<_> = all.into_iter().filter(|c| c.sample.parent != 1).collect();
        let results = fixture.aggregator().aggregate(&without_a);
        assert_eq!(results[0].best_match.as_ref().unwrap().source_id, "B");
    }

    #[test]
    fn test_unmatched_target() {
        let fixture = Fixture::new(&[("road", 25.0)], vec![east(0.0)]);
        let results = fixture.aggregator().aggregate(&[]);
        assert_eq!(results.len(), 1);
        assert!(results[0].best_match.is_none());
        assert_eq!(results[0].speed(), None);
        assert_eq!(results[0].percentage(), 0.0);
        assert_eq!(results[0].coverage, 0.0);
        assert_eq!(results[0].target_id, "t0");
    }

    #[test]
    fn test_total_possible_samples() {
        assert_eq!(total_possible_samples(40.0, 4.0), 10);
        assert_eq!(total_possible_samples(42.0, 4.0), 11);
        assert_eq!(total_possible_samples(1.0, 4.0), 1);
        assert_eq!(percentage(3, 0), 0.0);
    }
}
