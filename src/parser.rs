//! JSON decoder for schedule batches.

use serde_json::Value;
use tracing::debug;

use crate::error::DecodeError;
use crate::record::{Field, FieldValue, StopRecord};

/// Decodes a JSON array of stop objects into [`StopRecord`]s.
///
/// Values keep their JSON kind; checking them is left to the validators.
/// Keys other than the six schedule fields are skipped.
///
/// # Errors
///
/// Returns [`DecodeError`] if the bytes are not JSON, the top level is not
/// an array, or an element is not an object.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<StopRecord>, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::NotAnArray {
                found: kind(&other),
            });
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(map) = item else {
                return Err(DecodeError::NotAnObject { index });
            };

            let mut record = StopRecord::default();
            for (key, value) in map {
                match Field::from_name(key) {
                    Some(field) => record.set(field, FieldValue::from(value)),
                    None => debug!(index, key = %key, "Ignoring unknown field"),
                }
            }
            Ok(record)
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_array() {
        let records = parse_records(b"[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let result = parse_records(b"[{\"bus_id\": 128,");
        assert!(matches!(result, Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let result = parse_records(br#"{"bus_id": 128}"#);
        assert!(matches!(
            result,
            Err(DecodeError::NotAnArray { found: "an object" })
        ));
    }

    #[test]
    fn test_parse_rejects_non_object_element() {
        let result = parse_records(br#"[{"bus_id": 128}, 5]"#);
        assert!(matches!(result, Err(DecodeError::NotAnObject { index: 1 })));
    }

    #[test]
    fn test_parse_keeps_loose_types() {
        let bytes = br#"[{"bus_id": "512", "stop_id": 6, "a_time": 8.12, "stop_type": null, "zone": 3}]"#;
        let records = parse_records(bytes).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.bus_id, Some(FieldValue::Str("512".into())));
        assert_eq!(r.stop_id, Some(FieldValue::Int(6)));
        assert_eq!(r.a_time, Some(FieldValue::Float(8.12)));
        assert_eq!(r.stop_type, Some(FieldValue::Null));
        assert_eq!(r.stop_name, None);
    }
}
