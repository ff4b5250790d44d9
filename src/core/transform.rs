use crate::core::fetch::payload_records;
use crate::domain::model::{DataTable, Record};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Source column -> warehouse column. The rename is strict: a record missing
/// any source column fails the whole transform.
const COLUMN_RENAMES: [(&str, &str); 3] = [
    ("Id", "system_id"),
    ("Name", "system_name"),
    ("LastGenerated", "last_generated"),
];

pub const INGESTION_TIME_COLUMN: &str = "ingestion_time";

/// Build the tabular form of a payload. Pure apart from the caller-supplied
/// clock value, which is stamped on every row as an RFC 3339 string.
pub fn build_table(
    payload: &serde_json::Value,
    ingestion_time: DateTime<Utc>,
) -> Result<DataTable> {
    let records = payload_records(payload)?;

    // An empty payload has no columns to rename, so strict mode rejects it.
    if records.is_empty() {
        return Err(EtlError::SchemaError {
            message: format!("empty payload has no '{}' column", COLUMN_RENAMES[0].0),
        });
    }

    let stamp = serde_json::Value::String(ingestion_time.to_rfc3339());

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        rows.push(rename_record(record, &stamp)?);
    }

    Ok(DataTable {
        rows,
        ingestion_time,
    })
}

fn rename_record(record: Record, stamp: &serde_json::Value) -> Result<Record> {
    let mut source = record.data;
    let mut data = HashMap::with_capacity(source.len() + 1);

    for (from, to) in COLUMN_RENAMES {
        let value = source.remove(from).ok_or_else(|| EtlError::SchemaError {
            message: format!("missing source column '{}'", from),
        })?;
        data.insert(to.to_string(), value);
    }

    // Remaining columns pass through unchanged.
    for (key, value) in source {
        data.insert(key, value);
    }

    data.insert(INGESTION_TIME_COLUMN.to_string(), stamp.clone());
    Ok(Record { data })
}
