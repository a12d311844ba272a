//! This module is responsible for loading the source road network and the
//! target model network from GeoJSON and CSV files.

mod config;
mod delimited;
mod features;

use std::path::Path;

use geo::{Geometry, LineString};
use log::info;

pub use config::{SourceFilter, TargetFields};
pub use delimited::target_segments_from_csv;
pub use features::{source_roads_from_geojson, target_segments_from_geojson};

use crate::Error;
use crate::model::{SourceRoad, TargetSegment};

/// Reads source roads from a GeoJSON file
pub fn load_source_roads(path: &Path, filter: &SourceFilter) -> Result<Vec<SourceRoad>, Error> {
    filter.validate()?;
    let text = read_file(path)?;
    let roads = source_roads_from_geojson(&text, filter)?;
    info!("Loaded {} source roads from {}", roads.len(), path.display());
    Ok(roads)
}

/// Reads target segments from a `.csv` file with a WKT geometry column, or
/// from GeoJSON for any other extension
pub fn load_target_segments(
    path: &Path,
    fields: &TargetFields,
) -> Result<Vec<TargetSegment>, Error> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let segments = if is_csv {
        let file = std::fs::File::open(path).map_err(|e| with_path(e, path))?;
        target_segments_from_csv(file, fields)?
    } else {
        target_segments_from_geojson(&read_file(path)?, fields)?
    };
    info!(
        "Loaded {} target segments from {}",
        segments.len(),
        path.display()
    );
    Ok(segments)
}

fn read_file(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| with_path(e, path))
}

fn with_path(e: std::io::Error, path: &Path) -> Error {
    Error::IoError(std::io::Error::new(
        e.kind(),
        format!("Failed to open file '{}': {}", path.display(), e),
    ))
}

/// A line geometry: a `LineString`, or a `MultiLineString` with one part
fn single_line(geometry: Geometry<f64>) -> Option<LineString<f64>> {
    match geometry {
        Geometry::LineString(line) => Some(line),
        Geometry::MultiLineString(mut multi) if multi.0.len() == 1 => multi.0.pop(),
        _ => None,
    }
}
