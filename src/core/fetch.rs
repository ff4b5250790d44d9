use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;

/// The municipal API serves UTF-8 JSON, sometimes with a leading BOM.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode a response body into a parsed payload, tolerating a BOM prefix.
pub fn decode_payload(bytes: &[u8]) -> Result<serde_json::Value> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    Ok(serde_json::from_slice(body)?)
}

/// Flatten a payload into records. Accepts an array of objects (one record
/// each) or a single object (one record); anything else is a schema error.
pub fn payload_records(payload: &serde_json::Value) -> Result<Vec<Record>> {
    match payload {
        serde_json::Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    serde_json::Value::Object(obj) => {
                        let mut data = HashMap::new();
                        for (key, value) in obj {
                            data.insert(key.clone(), value.clone());
                        }
                        records.push(Record { data });
                    }
                    other => {
                        return Err(EtlError::SchemaError {
                            message: format!("expected a record object, got {}", other),
                        })
                    }
                }
            }
            Ok(records)
        }
        serde_json::Value::Object(obj) => {
            let mut data = HashMap::new();
            for (key, value) in obj {
                data.insert(key.clone(), value.clone());
            }
            Ok(vec![Record { data }])
        }
        other => Err(EtlError::SchemaError {
            message: format!("expected an array or object payload, got {}", other),
        }),
    }
}
