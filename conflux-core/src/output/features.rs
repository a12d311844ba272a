use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::{Value as JsonValue, json};

use super::{OutputRecord, target_of};
use crate::Error;
use crate::model::{ConflationResult, TargetSegment};

/// Converts results to a `GeoJSON` `FeatureCollection` over the target
/// geometries. Pass-through attributes come first; the conflation columns
/// overwrite attributes of the same name.
pub fn results_to_geojson(
    results: &[ConflationResult],
    targets: &[TargetSegment],
) -> Result<FeatureCollection, Error> {
    let features = results
        .iter()
        .map(|result| create_result_feature(result, target_of(result, targets)?))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}

pub fn results_to_geojson_string(
    results: &[ConflationResult],
    targets: &[TargetSegment],
) -> Result<String, Error> {
    serde_json::to_string(&results_to_geojson(results, targets)?)
        .map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_result_feature(
    result: &ConflationResult,
    target: &TargetSegment,
) -> Result<Feature, Error> {
    let mut properties = target.attributes.clone();
    let record = serde_json::to_value(OutputRecord::new(result, target))
        .map_err(|e| Error::GeoJsonError(e.to_string()))?;
    if let JsonValue::Object(columns) = record {
        properties.extend(columns);
    }

    let geometry = Geometry::new(GeoJsonValue::from(&target.geometry));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
