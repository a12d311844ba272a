use rayon::prelude::*;

use crate::geometry::interpolate;
use crate::model::{SamplePoint, SourceSubSegment};

/// Number of samples for a line of `length`: `ceil(length / step) + 1`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sample_count(length: f64, step: f64) -> usize {
    (length / step).ceil().max(0.0) as usize + 1
}

/// Lazy walk along a sub-segment at a fixed step.
///
/// Holds no shared state; calling [`sample`] again yields the same sequence.
#[derive(Debug, Clone)]
pub struct SampleIter<'a> {
    segment: &'a SourceSubSegment,
    segment_index: usize,
    step: f64,
    next: usize,
    count: usize,
}

impl Iterator for SampleIter<'_> {
    type Item = SamplePoint;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let sequence = self.next;
        self.next += 1;

        let fraction = if self.segment.length > 0.0 {
            (sequence as f64 * self.step / self.segment.length).min(1.0)
        } else {
            0.0
        };
        let geometry = interpolate(&self.segment.geometry, fraction)?;

        Some(SamplePoint {
            sequence,
            sub_segment: self.segment_index,
            parent: self.segment.parent,
            bearing: self.segment.bearing,
            octant: self.segment.octant,
            geometry,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (0, Some(remaining))
    }
}

/// Samples at fractions `min(n * step / length, 1)` for `n` in
/// `0..=ceil(length / step)`. The first sample is the start point and the
/// last one is exactly the end point.
pub fn sample(segment_index: usize, segment: &SourceSubSegment, step: f64) -> SampleIter<'_> {
    SampleIter {
        segment,
        segment_index,
        step,
        next: 0,
        count: sample_count(segment.length, step),
    }
}

/// Samples every sub-segment in parallel, keeping sub-segment order
pub fn sample_all(segments: &[SourceSubSegment], step: f64) -> Vec<SamplePoint> {
    segments
        .par_iter()
        .enumerate()
        .flat_map_iter(|(idx, segment)| sample(idx, segment, step))
        .collect()
}
