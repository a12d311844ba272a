use geo::{Coord, LineString, MapCoords, Rect};

/// Mean Earth radius (IUGG), metres
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Equirectangular projection around a fixed origin.
///
/// Within a metropolitan extent the distortion stays well below the sampling
/// step, which is all conflation needs: distances and bearings in metres
/// that are locally equidistant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: Coord<f64>,
    cos_origin_lat: f64,
}

impl LocalProjection {
    /// `origin` is a longitude/latitude pair in degrees
    pub fn new(origin: Coord<f64>) -> Self {
        Self {
            origin,
            cos_origin_lat: origin.y.to_radians().cos(),
        }
    }

    pub fn centered_on(extent: Rect<f64>) -> Self {
        Self::new(extent.center())
    }

    pub fn origin(&self) -> Coord<f64> {
        self.origin
    }

    pub fn project(&self, lon_lat: Coord<f64>) -> Coord<f64> {
        Coord {
            x: EARTH_RADIUS * (lon_lat.x - self.origin.x).to_radians() * self.cos_origin_lat,
            y: EARTH_RADIUS * (lon_lat.y - self.origin.y).to_radians(),
        }
    }
}

/// Frame in which every distance-based constant of a conflation run is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricFrame {
    /// Input coordinates are already metric
    Identity,
    /// Input is longitude/latitude and is reprojected around a local origin
    Local(LocalProjection),
}

impl MetricFrame {
    pub fn to_metric(&self, line: &LineString<f64>) -> LineString<f64> {
        match self {
            MetricFrame::Identity => line.clone(),
            MetricFrame::Local(projection) => line.map_coords(|c| projection.project(c)),
        }
    }
}
