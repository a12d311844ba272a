use std::io::Read;

use serde_json::{Map, Value as JsonValue};
use wkt::TryFromWkt;

use super::{TargetFields, single_line};
use crate::Error;
use crate::model::TargetSegment;

/// Reads target segments from CSV with a WKT geometry column.
///
/// Empty cells read as missing values. Columns not named in `fields` are
/// passed through as strings.
pub fn target_segments_from_csv<R: Read>(
    reader: R,
    fields: &TargetFields,
) -> Result<Vec<TargetSegment>, Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let column = |name: &str| headers.iter().position(|header| header == name);
    let id_column = column(&fields.id)
        .ok_or_else(|| Error::InvalidData(format!("CSV has no '{}' column", fields.id)))?;
    let geometry_column = column(&fields.geometry)
        .ok_or_else(|| Error::InvalidData(format!("CSV has no '{}' column", fields.geometry)))?;
    let from_column = column(&fields.from_node);
    let to_column = column(&fields.to_node);
    let fallback_column = fields.fallback_speed.as_deref().and_then(column);

    let mut segments = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |position: Option<usize>| {
            position
                .and_then(|position| record.get(position))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let id = cell(Some(id_column))
            .ok_or_else(|| Error::InvalidData(format!("CSV row {} has an empty id", row + 1)))?;
        let wkt_text = cell(Some(geometry_column)).ok_or_else(|| {
            Error::InvalidData(format!("target '{id}' has an empty geometry cell"))
        })?;
        let geometry = geo::Geometry::<f64>::try_from_wkt_str(&wkt_text)
            .map_err(|e| Error::WktError(format!("target '{id}': {e}")))?;
        let geometry = single_line(geometry).ok_or_else(|| {
            Error::InvalidData(format!(
                "target '{id}' is not a LINESTRING or a single-part MULTILINESTRING"
            ))
        })?;

        let attributes: Map<String, JsonValue> = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !fields.is_reserved(name))
            .map(|(name, value)| (name.to_string(), JsonValue::String(value.to_string())))
            .collect();

        segments.push(TargetSegment {
            from_node: cell(from_column),
            to_node: cell(to_column),
            fallback_speed: cell(fallback_column),
            attributes,
            id,
            geometry,
        });
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    const NETWORK: &str = "\
A_B,A,B,SPEED,LANES,geometry
10_11,10,11,35 mph,2,\"LINESTRING (0 0, 40 0)\"
11_10,11,10,,2,\"MULTILINESTRING ((40 6, 0 6))\"
";

    fn fields() -> TargetFields {
        TargetFields {
            id: "A_B".into(),
            from_node: "A".into(),
            to_node: "B".into(),
            fallback_speed: Some("SPEED".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_reads_wkt_targets() {
        let targets = target_segments_from_csv(NETWORK.as_bytes(), &fields()).unwrap();
        assert_eq!(targets.len(), 2);

        assert_eq!(targets[0].id, "10_11");
        assert_eq!(targets[0].from_node.as_deref(), Some("10"));
        assert_eq!(targets[0].fallback_speed.as_deref(), Some("35 mph"));
        assert_eq!(
            targets[0].geometry,
            line_string![(x: 0.0, y: 0.0), (x: 40.0, y: 0.0)]
        );
        assert_eq!(targets[0].attributes.len(), 1);
        assert_eq!(targets[0].attributes["LANES"], JsonValue::from("2"));

        assert_eq!(targets[1].fallback_speed, None);
        assert_eq!(
            targets[1].geometry,
            line_string![(x: 40.0, y: 6.0), (x: 0.0, y: 6.0)]
        );
    }

    #[test]
    fn test_missing_id_column() {
        let result = target_segments_from_csv(NETWORK.as_bytes(), &TargetFields::default());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_invalid_wkt() {
        let text = "id,geometry\n1,\"LINESTRING (0 0,\"\n";
        let result = target_segments_from_csv(text.as_bytes(), &TargetFields::default());
        assert!(matches!(result, Err(Error::WktError(_))));
    }

    #[test]
    fn test_polygon_rejected() {
        let text = "id,geometry\n1,\"POLYGON ((0 0, 1 0, 1 1, 0 0))\"\n";
        let result = target_segments_from_csv(text.as_bytes(), &TargetFields::default());
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }
}
