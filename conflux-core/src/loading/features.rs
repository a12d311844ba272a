use geo::LineString;
use geojson::{Feature, GeoJson, JsonObject, JsonValue, feature::Id};
use log::debug;
use serde_json::Map;

use super::{SourceFilter, TargetFields, single_line};
use crate::Error;
use crate::model::{SourceRoad, TargetSegment};

/// Parses source roads from GeoJSON text.
///
/// Reads the `id`, `class`, `speed_limits` and `connectors` properties. The
/// encodings may be strings or inline JSON values; inline values are kept as
/// their JSON text. A feature without an `id` property falls back to the
/// feature id.
pub fn source_roads_from_geojson(
    text: &str,
    filter: &SourceFilter,
) -> Result<Vec<SourceRoad>, Error> {
    let features = parse_features(text)?;
    let total = features.len();

    let mut roads = Vec::with_capacity(total);
    for (position, feature) in features.into_iter().enumerate() {
        let Feature {
            geometry,
            properties,
            id,
            ..
        } = feature;
        let properties = properties.as_ref();

        let id = resolve_id(properties, id.as_ref(), "id")
            .ok_or_else(|| Error::InvalidData(format!("source feature #{position} has no id")))?;
        let geometry = feature_line(geometry, &id)?;

        let road = SourceRoad {
            class: property_text(properties, "class"),
            speed_limits: property_text(properties, "speed_limits"),
            connectors: property_text(properties, "connectors"),
            id,
            geometry,
        };
        if filter.keeps(&road) {
            roads.push(road);
        }
    }

    if roads.len() < total {
        debug!(
            "Source filter dropped {} of {total} roads",
            total - roads.len()
        );
    }
    Ok(roads)
}

/// Parses target segments from GeoJSON text. Properties not named in `fields`
/// are passed through to the output unchanged.
pub fn target_segments_from_geojson(
    text: &str,
    fields: &TargetFields,
) -> Result<Vec<TargetSegment>, Error> {
    parse_features(text)?
        .into_iter()
        .enumerate()
        .map(|(position, feature)| {
            let Feature {
                geometry,
                properties,
                id,
                ..
            } = feature;
            let properties = properties.as_ref();

            let id = resolve_id(properties, id.as_ref(), &fields.id).ok_or_else(|| {
                Error::InvalidData(format!(
                    "target feature #{position} has no '{}' property",
                    fields.id
                ))
            })?;
            let geometry = feature_line(geometry, &id)?;

            let attributes: Map<String, JsonValue> = properties
                .map(|props| {
                    props
                        .iter()
                        .filter(|(name, _)| !fields.is_reserved(name))
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect()
                })
                .unwrap_or_default();

            Ok(TargetSegment {
                from_node: property_text(properties, &fields.from_node),
                to_node: property_text(properties, &fields.to_node),
                fallback_speed: fields
                    .fallback_speed
                    .as_deref()
                    .and_then(|name| property_text(properties, name)),
                attributes,
                id,
                geometry,
            })
        })
        .collect()
}

fn parse_features(text: &str) -> Result<Vec<Feature>, Error> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(_) => Err(Error::InvalidData(
            "expected a FeatureCollection, found a bare geometry".to_string(),
        )),
    }
}

fn property_text(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn resolve_id(properties: Option<&JsonObject>, id: Option<&Id>, key: &str) -> Option<String> {
    property_text(properties, key).or_else(|| {
        id.map(|id| match id {
            Id::String(text) => text.clone(),
            Id::Number(number) => number.to_string(),
        })
    })
}

fn feature_line(geometry: Option<geojson::Geometry>, id: &str) -> Result<LineString<f64>, Error> {
    let geometry =
        geometry.ok_or_else(|| Error::InvalidData(format!("feature '{id}' has no geometry")))?;
    let geometry = geo::Geometry::<f64>::try_from(geometry)?;
    single_line(geometry).ok_or_else(|| {
        Error::InvalidData(format!(
            "feature '{id}' is not a LineString or a single-part MultiLineString"
        ))
    })
}
