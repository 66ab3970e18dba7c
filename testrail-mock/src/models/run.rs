use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Membership of a case in a run, with its per-run status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub id: i64,
    pub run_id: i64,
    pub case_id: i64,
    pub status_id: i64,
    pub comment: Option<String>,
    pub elapsed: Option<String>,
}
