//! Machine-readable run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ClassResult, RunSummary};

/// Full record of a run, serialized for `--format json`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub success: bool,
    pub summary: RunSummary,
    pub classes: Vec<ClassResult>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>, elapsed_ms: u64, classes: Vec<ClassResult>) -> Self {
        let summary = RunSummary::new(&classes);
        Self {
            started_at,
            elapsed_ms,
            success: summary.is_success(),
            summary,
            classes,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
