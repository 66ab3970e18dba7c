use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message row. `ts` is the Slack-style `<epoch>.<micros>` string and is
/// unique per store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub ts: String,
    pub channel_id: String,
    pub user: String,
    pub text: String,
    pub thread_ts: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl Message {
    /// Shape used inside API responses.
    pub fn to_slack_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "message",
            "user": self.user,
            "text": self.text,
            "ts": self.ts,
            "thread_ts": self.thread_ts
        })
    }
}
