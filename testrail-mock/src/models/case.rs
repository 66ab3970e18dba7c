use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One manual test step with its expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    pub step: String,
    pub expected: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub section_id: i64,
    pub title: String,
    pub template_id: i64,
    pub type_id: i64,
    pub priority_id: i64,
    pub steps: Option<Vec<TestStep>>,
    pub expected_result: Option<String>,
    pub preconditions: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Creation payload; unknown keys are ignored, ids fall back to TestRail's
/// defaults (text template, functional type, high priority).
#[derive(Debug, Clone, Deserialize)]
pub struct CaseDraft {
    pub title: String,
    #[serde(default = "default_template")]
    pub template_id: i64,
    #[serde(default = "default_type")]
    pub type_id: i64,
    #[serde(default = "default_priority")]
    pub priority_id: i64,
    #[serde(default)]
    pub steps: Option<Vec<TestStep>>,
    #[serde(default)]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub preconditions: Option<String>,
}

/// Partial update payload: only present keys are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasePatch {
    pub title: Option<String>,
    pub template_id: Option<i64>,
    pub type_id: Option<i64>,
    pub priority_id: Option<i64>,
    pub steps: Option<Vec<TestStep>>,
    pub expected_result: Option<String>,
    pub preconditions: Option<String>,
}

fn default_template() -> i64 {
    1
}

fn default_type() -> i64 {
    1
}

fn default_priority() -> i64 {
    2
}
