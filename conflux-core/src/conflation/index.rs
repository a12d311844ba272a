use geo::{BoundingRect, Point};
use rstar::{AABB, RTree, RTreeObject};

use super::IndexKind;
use crate::geometry::point_line_distance;
use crate::model::PreparedTarget;

/// Finds target segments near a point.
///
/// Implementations return `(position in the target slice, distance)` for every
/// target whose geometry lies within `radius` of `point`, ordered by position.
pub trait ProximityIndex: Sync {
    fn within_radius(&self, point: &Point<f64>, radius: f64) -> Vec<(usize, f64)>;
}

/// Envelope of one target segment inside the R-tree
struct IndexedTarget {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedTarget {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// R-tree over target bounding boxes, refined by exact line distance
pub struct RTreeIndex<'a> {
    tree: RTree<IndexedTarget>,
    targets: &'a [PreparedTarget],
}

impl<'a> RTreeIndex<'a> {
    pub fn new(targets: &'a [PreparedTarget]) -> Self {
        let entries = targets
            .iter()
            .enumerate()
            .filter_map(|(position, target)| {
                let rect = target.geometry.bounding_rect()?;
                Some(IndexedTarget {
                    position,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
            targets,
        }
    }
}

impl ProximityIndex for RTreeIndex<'_> {
    fn within_radius(&self, point: &Point<f64>, radius: f64) -> Vec<(usize, f64)> {
        let search = AABB::from_corners(
            [point.x() - radius, point.y() - radius],
            [point.x() + radius, point.y() + radius],
        );

        let mut found: Vec<(usize, f64)> = self
            .tree
            .locate_in_envelope_intersecting(&search)
            .filter_map(|entry| {
                let distance = point_line_distance(point, &self.targets[entry.position].geometry);
                (distance <= radius).then_some((entry.position, distance))
            })
            .collect();
        found.sort_unstable_by_key(|(position, _)| *position);
        found
    }
}

/// Compares the point with every target
pub struct BruteForceIndex<'a> {
    targets: &'a [PreparedTarget],
}

impl<'a> BruteForceIndex<'a> {
    pub fn new(targets: &'a [PreparedTarget]) -> Self {
        Self { targets }
    }
}

impl ProximityIndex for BruteForceIndex<'_> {
    fn within_radius(&self, point: &Point<f64>, radius: f64) -> Vec<(usize, f64)> {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(position, target)| {
                let distance = point_line_distance(point, &target.geometry);
                (distance <= radius).then_some((position, distance))
            })
            .collect()
    }
}

pub fn build_index<'a>(
    kind: IndexKind,
    targets: &'a [PreparedTarget],
) -> Box<dyn ProximityIndex + 'a> {
    match kind {
        IndexKind::Rtree => Box::new(RTreeIndex::new(targets)),
        IndexKind::BruteForce => Box::new(BruteForceIndex::new(targets)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point};
    use serde_json::Map;

    use crate::geometry::MetricFrame;
    use crate::model::TargetSegment;

    fn targets() -> Vec<PreparedTarget> {
        let lines = [
            line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)],
            line_string![(x: 0.0, y: 30.0), (x: 100.0, y: 30.0)],
            line_string![(x: 50.0, y: -50.0), (x: 50.0, y: 50.0)],
            line_string![(x: 500.0, y: 500.0), (x: 600.0, y: 500.0)],
        ];
        lines
            .into_iter()
            .enumerate()
            .map(|(idx, geometry)| {
                let segment = TargetSegment {
                    id: idx.to_string(),
                    from_node: None,
                    to_node: None,
                    fallback_speed: None,
                    attributes: Map::new(),
                    geometry,
                };
                PreparedTarget::new(idx, &segment, &MetricFrame::Identity)
            })
            .collect()
    }

    #[test]
    fn test_rtree_matches_brute_force() {
        let targets = targets();
        let rtree = RTreeIndex::new(&targets);
        let brute = BruteForceIndex::new(&targets);
        assert_eq!(rtree.tree.size(), 4);

        for p in [
            point!(x: 10.0, y: 5.0),
            point!(x: 50.0, y: 25.0),
            point!(x: 50.0, y: 15.0),
            point!(x: 300.0, y: 300.0),
            point!(x: 595.0, y: 509.0),
        ] {
            assert_eq!(rtree.within_radius(&p, 10.0), brute.within_radius(&p, 10.0));
        }
    }

    #[test]
    fn test_exact_distance_refines_envelopes() {
        let targets = targets();
        let index = RTreeIndex::new(&targets);

        let hits = index.within_radius(&point!(x: 10.0, y: 6.0), 10.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
        approx::assert_relative_eq!(hits[0].1, 6.0, epsilon = 1e-9);

        // Inside the bounding box search window but farther than the radius
        let corner = index.within_radius(&point!(x: 108.0, y: 8.0), 10.0);
        assert!(corner.is_empty());
    }

    #[test]
    fn test_multiple_hits_sorted() {
        let targets = targets();
        let index = build_index(IndexKind::Rtree, &targets);
        let hits: Vec<usize> = index
            .within_radius(&point!(x: 52.0, y: 2.0), 10.0)
            .into_iter()
            .map(|(position, _)| position)
            .collect();
        assert_eq!(hits, vec![0, 2]);
    }
}
