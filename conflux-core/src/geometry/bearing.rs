use std::fmt;

use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::Bearing;

/// Bearing from `from` to `to` in degrees clockwise from north
pub fn bearing(from: Coord<f64>, to: Coord<f64>) -> Bearing {
    normalize_bearing((to.x - from.x).atan2(to.y - from.y).to_degrees())
}

/// Bearing of a whole line, taken from its first to its last coordinate.
///
/// Returns `None` for lines with fewer than two coordinates.
pub fn line_bearing(line: &LineString<f64>) -> Option<Bearing> {
    if line.0.len() < 2 {
        return None;
    }
    let first = *line.0.first()?;
    let last = *line.0.last()?;
    Some(bearing(first, last))
}

pub fn normalize_bearing(degrees: f64) -> Bearing {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Smallest angle between two bearings, in `[0, 180]`
pub fn angular_difference(a: Bearing, b: Bearing) -> f64 {
    let diff = (a - b).abs().rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Bearing agreement between a target segment and a source sample.
///
/// The source network is undirected, so a sample agrees with a target either
/// when it points the same way or when it points exactly the opposite way,
/// both within `tolerance` degrees.
pub fn bearings_agree(target: Bearing, sample: Bearing, tolerance: f64) -> bool {
    angular_difference(target, sample) <= tolerance
        || angular_difference(target, normalize_bearing(sample + 180.0)) <= tolerance
}

/// Compass quadrant of a bearing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Octant {
    N,
    E,
    S,
    W,
}

impl Octant {
    /// Buckets are inclusive on both ends and checked in N, E, S, W order, so
    /// the boundary bearings resolve to the first matching bucket:
    /// 45 is N, 135 is E, 225 is S and 315 is N.
    pub fn from_bearing(bearing: Bearing) -> Self {
        [Octant::N, Octant::E, Octant::S, Octant::W]
            .into_iter()
            .find(|octant| octant.contains(bearing))
            .unwrap_or(Octant::W)
    }

    /// Inclusive bucket membership; boundary bearings belong to both neighbours
    pub fn contains(self, bearing: Bearing) -> bool {
        match self {
            Octant::N => bearing >= 315.0 || bearing <= 45.0,
            Octant::E => (45.0..=135.0).contains(&bearing),
            Octant::S => (135.0..=225.0).contains(&bearing),
            Octant::W => (225.0..=315.0).contains(&bearing),
        }
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Octant::N => "N",
            Octant::E => "E",
            Octant::S => "S",
            Octant::W => "W",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{coord, line_string};

    #[test]
    fn test_cardinal_bearings() {
        let origin = coord! { x: 0.0, y: 0.0 };
        assert_relative_eq!(bearing(origin, coord! { x: 0.0, y: 1.0 }), 0.0);
        assert_relative_eq!(bearing(origin, coord! { x: 1.0, y: 0.0 }), 90.0);
        assert_relative_eq!(bearing(origin, coord! { x: 0.0, y: -1.0 }), 180.0);
        assert_relative_eq!(bearing(origin, coord! { x: -1.0, y: 0.0 }), 270.0);
        assert_relative_eq!(bearing(origin, coord! { x: 1.0, y: 1.0 }), 45.0);
    }

    #[test]
    fn test_line_bearing_uses_endpoints() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0)];
        assert_relative_eq!(line_bearing(&line).unwrap(), 45.0);

        let single = line_string![(x: 0.0, y: 0.0)];
        assert!(line_bearing(&single).is_none());
    }

    #[test]
    fn test_normalize_bearing() {
        assert_relative_eq!(normalize_bearing(-90.0), 270.0);
        assert_relative_eq!(normalize_bearing(450.0), 90.0);
        assert_eq!(normalize_bearing(-1e-18), 0.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
    }

    #[test]
    fn test_octant_boundaries_are_inclusive() {
        assert_eq!(Octant::from_bearing(0.0), Octant::N);
        assert_eq!(Octant::from_bearing(45.0), Octant::N);
        assert_eq!(Octant::from_bearing(45.5), Octant::E);
        assert_eq!(Octant::from_bearing(135.0), Octant::E);
        assert_eq!(Octant::from_bearing(180.0), Octant::S);
        assert_eq!(Octant::from_bearing(225.0), Octant::S);
        assert_eq!(Octant::from_bearing(270.0), Octant::W);
        assert_eq!(Octant::from_bearing(315.0), Octant::N);
        assert_eq!(Octant::from_bearing(359.9), Octant::N);

        for boundary in [45.0, 135.0, 225.0, 315.0] {
            let owners = [Octant::N, Octant::E, Octant::S, Octant::W]
                .into_iter()
                .filter(|o| o.contains(boundary))
                .count();
            assert_eq!(owners, 2, "boundary {boundary} should belong to two buckets");
        }
    }

    #[test]
    fn test_octant_defined_everywhere() {
        let mut b = 0.0;
        while b < 360.0 {
            let octant = Octant::from_bearing(b);
            assert!(octant.contains(b), "{b} resolved to {octant} without belonging to it");
            b += 0.25;
        }
    }

    #[test]
    fn test_bearing_agreement() {
        assert!(bearings_agree(90.0, 92.0, 20.0));
        assert!(bearings_agree(90.0, 272.0, 20.0));
        assert!(!bearings_agree(200.0, 92.0, 20.0));
        assert!(bearings_agree(355.0, 5.0, 20.0));
        assert!(bearings_agree(10.0, 185.0, 20.0));
        assert!(bearings_agree(90.0, 110.0, 20.0));
        assert!(!bearings_agree(90.0, 110.5, 20.0));
    }

    #[test]
    fn test_bearing_agreement_symmetric_under_rotation() {
        let mut target = 0.0;
        while target < 360.0 {
            let mut sample = 0.0;
            while sample < 360.0 {
                let rotated = normalize_bearing(sample + 180.0);
                assert_eq!(
                    bearings_agree(target, sample, 20.0),
                    bearings_agree(target, rotated, 20.0),
                    "target {target}, sample {sample}"
                );
                sample += 7.0;
            }
            target += 11.0;
        }
    }
}
