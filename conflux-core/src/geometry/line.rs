use geo::{Distance, Euclidean, Length, LineInterpolatePoint, LineSplit, LineString, Point};

/// Planar length of a line
pub fn line_length(line: &LineString<f64>) -> f64 {
    Euclidean.length(line)
}

/// Point at parametric `fraction` of the arc length.
///
/// A zero-length line yields its first coordinate.
pub fn interpolate(line: &LineString<f64>, fraction: f64) -> Option<Point<f64>> {
    line.line_interpolate_point(fraction.clamp(0.0, 1.0))
        .or_else(|| line.points().next())
}

/// Substring between two parametric positions.
///
/// Fractions are clamped to `[0, 1]` and reordered if needed. The result
/// keeps every original vertex strictly inside the requested range, so
/// consecutive splits concatenate back into the input line. Equal fractions
/// produce a zero-length line of two identical coordinates.
pub fn split(line: &LineString<f64>, start_fraction: f64, end_fraction: f64) -> LineString<f64> {
    let (start, end) = {
        let a = start_fraction.clamp(0.0, 1.0);
        let b = end_fraction.clamp(0.0, 1.0);
        if a <= b { (a, b) } else { (b, a) }
    };

    line.line_split_twice(start, end)
        .and_then(|pieces| pieces.into_second())
        .unwrap_or_else(|| {
            let at = interpolate(line, start).map_or_else(Vec::new, |point| vec![point.0; 2]);
            LineString::new(at)
        })
}

/// Shortest planar distance between a point and a line
pub fn point_line_distance(point: &Point<f64>, line: &LineString<f64>) -> f64 {
    Euclidean.distance(point, line)
}
