use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    pub case_id: i64,
    pub status_id: i64,
    pub comment: Option<String>,
    pub elapsed: Option<String>,
    pub created_on: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultDraft {
    pub status_id: i64,
    #[serde(default)]
    pub comment: Option<String>,
    /// Time taken, freeform (e.g. "2m 30s")
    #[serde(default)]
    pub elapsed: Option<String>,
}
