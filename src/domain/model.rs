use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One source row, keyed by column name. Serializes as the bare map so a
/// row round-trips as a plain JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

/// Tabular form of one run: renamed rows plus the single ingestion
/// timestamp shared by every row.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub rows: Vec<Record>,
    pub ingestion_time: DateTime<Utc>,
}

impl DataTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

pub const STATUS_SUCCESS: &str = "Success";
pub const STATUS_FAILED: &str = "Failed";

/// Terminal result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub status: String,
    pub code: u16,
}

impl PipelineOutcome {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            code: 200,
        }
    }

    pub fn failed() -> Self {
        Self {
            status: STATUS_FAILED.to_string(),
            code: 500,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }
}
