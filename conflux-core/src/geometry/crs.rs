//! Reprojection through PROJ, used when a run names an explicit metric CRS
//! instead of relying on the local equirectangular frame.

use geo::{LineString, MapCoords};
use proj::Proj;

use crate::Error;

const LON_LAT: &str = "EPSG:4326";

/// Transformation from longitude/latitude into a metric CRS
pub struct CrsTransform {
    target: String,
    proj: Proj,
}

impl CrsTransform {
    /// `target` is any definition PROJ understands, e.g. `EPSG:32618`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if PROJ cannot build the transformation
    pub fn from_lon_lat(target: &str) -> Result<Self, Error> {
        let proj = Proj::new_known_crs(LON_LAT, target, None).map_err(|e| {
            Error::InvalidConfig(format!("cannot build a projection to '{target}': {e}"))
        })?;
        Ok(Self {
            target: target.to_string(),
            proj,
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if a coordinate cannot be transformed
    pub fn transform(&self, line: &LineString<f64>) -> Result<LineString<f64>, Error> {
        line.try_map_coords(|c| self.proj.convert(c)).map_err(|e| {
            Error::InvalidData(format!("cannot project into '{}': {e}", self.target))
        })
    }
}
