use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored issue. Keys look like `QA-<id>` and are assigned on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
    pub created_on: DateTime<Utc>,
}

impl Issue {
    /// Jira-shaped representation: `{"id", "key", "fields": {...}}`.
    pub fn to_jira_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "key": self.key,
            "fields": {
                "summary": self.summary,
                "description": self.description,
                "issuetype": { "name": self.issue_type }
            }
        })
    }

    /// Slim shape used by search results.
    pub fn to_search_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "key": self.key,
            "fields": { "summary": self.summary }
        })
    }
}
