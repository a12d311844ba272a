use std::collections::BTreeMap;

use log::info;
use ordered_float::OrderedFloat;

use crate::model::ConflationResult;

/// Counters collected over one conflation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflationStats {
    pub source_roads: usize,
    pub roads_without_speed: usize,
    pub sub_segments: usize,
    pub samples: usize,
    pub candidates: usize,
    pub targets: usize,
    /// Targets with at least one candidate match
    pub matched_targets: usize,
    /// Targets that received a speed
    pub accepted_targets: usize,
    /// Number of accepted targets per assigned speed
    pub speed_histogram: BTreeMap<OrderedFloat<f64>, usize>,
}

impl ConflationStats {
    pub(crate) fn record_results(&mut self, results: &[ConflationResult]) {
        self.targets = results.len();
        self.matched_targets = results.iter().filter(|r| r.best_match.is_some()).count();
        self.accepted_targets = 0;
        self.speed_histogram.clear();
        for speed in results.iter().filter_map(ConflationResult::speed) {
            self.accepted_targets += 1;
            *self.speed_histogram.entry(OrderedFloat(speed)).or_default() += 1;
        }
    }

    pub fn unmatched_targets(&self) -> usize {
        self.targets - self.accepted_targets
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn accepted_share(&self) -> f64 {
        if self.targets == 0 {
            0.0
        } else {
            100.0 * self.accepted_targets as f64 / self.targets as f64
        }
    }

    pub fn log_summary(&self) {
        info!(
            "Source roads: {} ({} without a usable speed), {} sub-segments, {} samples",
            self.source_roads, self.roads_without_speed, self.sub_segments, self.samples
        );
        info!(
            "Targets: {} total, {} with candidates, {} assigned a speed ({:.1}%), {} candidate matches",
            self.targets,
            self.matched_targets,
            self.accepted_targets,
            self.accepted_share(),
            self.candidates
        );
        for (speed, count) in &self.speed_histogram {
            info!("  speed {}: {count} segments", speed.into_inner());
        }
    }
}
