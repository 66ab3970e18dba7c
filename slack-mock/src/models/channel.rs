use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A channel row. Ids follow Slack's `C...` convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub purpose: String,
    pub is_private: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}
