use serde_json::Value as JsonValue;

/// Placeholders that exporters write for a missing list
const EMPTY_MARKERS: [&str; 6] = ["", "null", "None", "nan", "NaN", "[]"];

/// Parses a serialized list of records.
///
/// Accepts strict JSON as well as the single-quoted dialect with
/// `None`/`True`/`False` literals. A lone record is treated as a list of one.
/// Returns `Some(vec![])` for the usual empty placeholders and `None` when the
/// text is not a list encoding at all.
pub(super) fn parse_record_list(raw: &str) -> Option<Vec<JsonValue>> {
    let trimmed = raw.trim();
    if EMPTY_MARKERS.contains(&trimmed) {
        return Some(Vec::new());
    }

    let value = serde_json::from_str::<JsonValue>(trimmed)
        .ok()
        .or_else(|| serde_json::from_str::<JsonValue>(&normalize_quoting(trimmed)).ok())?;

    match value {
        JsonValue::Array(items) => Some(items),
        JsonValue::Null => Some(Vec::new()),
        JsonValue::Object(_) | JsonValue::Number(_) => Some(vec![value]),
        // Lists that were serialized twice
        JsonValue::String(inner) if inner.trim() != trimmed => parse_record_list(&inner),
        _ => None,
    }
}

fn normalize_quoting(text: &str) -> String {
    text.replace('\'', "\"")
        .replace("None", "null")
        .replace("True", "true")
        .replace("False", "false")
}

/// Reads a number stored either as a JSON number or as numeric text
pub(super) fn as_number(value: &JsonValue) -> Option<f64> {
    let number: Option<f64> = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// First decimal number that appears in `text` at or after `from`
pub(super) fn first_number_after(text: &str, from: usize) -> Option<f64> {
    let tail = text.get(from..)?;
    let start = tail.find(|c: char| c.is_ascii_digit())?;
    let digits: String = tail[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
