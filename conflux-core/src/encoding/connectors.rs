use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde_json::Value as JsonValue;

use super::lenient::{as_number, parse_record_list};

/// Parses connector linear references into sorted fractions.
///
/// Connectors are records like `{"connector_id": "...", "at": 0.25}`; bare
/// numbers are accepted as well. Values are clamped to `[0, 1]` and repeated
/// positions are kept. A malformed encoding yields no fractions, which callers
/// treat as "no connectors".
pub fn parse_connector_fractions(raw: &str) -> Vec<f64> {
    let Some(records) = parse_record_list(raw) else {
        log::trace!("Ignoring malformed connector encoding: {raw}");
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| match record {
            JsonValue::Object(fields) => fields.get("at").and_then(as_number),
            other => as_number(other),
        })
        .map(|at| OrderedFloat(at.clamp(0.0, 1.0)))
        .sorted()
        .map(OrderedFloat::into_inner)
        .collect()
}
