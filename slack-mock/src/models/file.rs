use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded file record. Only metadata is kept; content is discarded after
/// sizing, this is a mock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackFile {
    pub id: String,
    pub message_id: Option<i64>,
    pub name: String,
    pub title: String,
    pub mimetype: String,
    pub filetype: String,
    pub size: i64,
    pub url_private: String,
    pub permalink: String,
    pub created_on: DateTime<Utc>,
}

impl SlackFile {
    pub fn to_slack_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "title": self.title,
            "mimetype": self.mimetype,
            "filetype": self.filetype,
            "size": self.size,
            "url_private": self.url_private,
            "permalink": self.permalink,
            "timestamp": self.created_on.timestamp()
        })
    }
}
