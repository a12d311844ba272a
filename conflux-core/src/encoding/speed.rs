use serde_json::Value as JsonValue;

use super::lenient::{as_number, first_number_after, parse_record_list};
use crate::model::{SpeedLimit, SpeedUnit};

/// Extracts a single speed limit from a serialized list of speed rules.
///
/// Rules look like `{"max_speed": {"value": 25, "unit": "mph"}, "when": ...}`.
/// The first rule with a maximum speed wins; a minimum speed is used only when
/// no rule has a maximum. Text that is not a list encoding is scanned for the
/// first number following a `value` key. Non-positive values are rejected.
pub fn extract_speed_limit(raw: &str) -> Option<SpeedLimit> {
    let limit = match parse_record_list(raw) {
        Some(rules) => {
            first_rule_speed(&rules, "max_speed").or_else(|| first_rule_speed(&rules, "min_speed"))
        }
        None => scan_speed(raw),
    };
    limit.filter(|limit| limit.value > 0.0)
}

fn first_rule_speed(rules: &[JsonValue], key: &str) -> Option<SpeedLimit> {
    rules.iter().find_map(|rule| match rule {
        JsonValue::Object(fields) if fields.contains_key("value") => speed_value(rule),
        JsonValue::Object(fields) => fields.get(key).and_then(speed_value),
        bare => speed_value(bare),
    })
}

fn speed_value(value: &JsonValue) -> Option<SpeedLimit> {
    match value {
        JsonValue::Object(fields) => {
            let speed = fields.get("value").and_then(as_number)?;
            let unit = fields
                .get("unit")
                .and_then(JsonValue::as_str)
                .and_then(|unit| unit.parse::<SpeedUnit>().ok());
            Some(SpeedLimit::new(speed, unit))
        }
        other => as_number(other).map(|speed| SpeedLimit::new(speed, None)),
    }
}

fn scan_speed(raw: &str) -> Option<SpeedLimit> {
    let value = match raw.find("value") {
        Some(idx) => first_number_after(raw, idx + "value".len())?,
        None => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())?,
    };
    Some(SpeedLimit::new(value, scan_unit(raw)))
}

fn scan_unit(raw: &str) -> Option<SpeedUnit> {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("mph") {
        Some(SpeedUnit::Mph)
    } else if lower.contains("km/h") || lower.contains("kph") {
        Some(SpeedUnit::Kmh)
    } else {
        None
    }
}

/// First positive number in a free-text speed attribute such as `"35 mph"`
pub fn parse_fallback_speed(text: &str) -> Option<f64> {
    first_number_after(text, 0).filter(|v| *v > 0.0)
}
