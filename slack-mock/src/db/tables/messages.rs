//! Message database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row, ToSql};
use std::time::{SystemTime, UNIX_EPOCH};

use super::super::Database;
use crate::models::Message;

pub(crate) fn map_message(row: &Row) -> rusqlite::Result<Message> {
    let created_on_str: String = row.get(6)?;

    Ok(Message {
        id: row.get(0)?,
        ts: row.get(1)?,
        channel_id: row.get(2)?,
        user: row.get(3)?,
        text: row.get(4)?,
        thread_ts: row.get(5)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const MESSAGE_COLUMNS: &str = "id, ts, channel_id, user, text, thread_ts, created_on";

impl Database {
    /// Slack-style timestamp: `<epoch seconds>.<microseconds>`
    fn generate_ts() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        format!("{}.{:06}", now.as_secs(), now.subsec_micros())
    }

    pub fn create_message(
        &self,
        channel_id: &str,
        user: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> SqliteResult<Message> {
        self.insert_message(&Self::generate_ts(), channel_id, user, text, thread_ts)
    }

    /// Insert with a caller-provided ts (seeding, tests)
    pub fn insert_message(
        &self,
        ts: &str,
        channel_id: &str,
        user: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> SqliteResult<Message> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO messages (ts, channel_id, user, text, thread_ts, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (ts, channel_id, user, text, thread_ts, &now),
        )?;
        let id = conn.last_insert_rowid();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM messages WHERE id = ?1",
            MESSAGE_COLUMNS
        ))?;
        stmt.query_row([id], map_message)
    }

    /// Newest-first page of a channel's messages, optionally bounded by a
    /// `oldest <= ts <= latest` window
    pub fn get_messages(
        &self,
        channel_id: &str,
        limit: i64,
        oldest: Option<&str>,
        latest: Option<&str>,
    ) -> SqliteResult<Vec<Message>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!(
            "SELECT {} FROM messages WHERE channel_id = ?",
            MESSAGE_COLUMNS
        );
        let mut params: Vec<&dyn ToSql> = vec![&channel_id];
        if let Some(ref oldest) = oldest {
            sql.push_str(" AND ts >= ?");
            params.push(oldest);
        }
        if let Some(ref latest) = latest {
            sql.push_str(" AND ts <= ?");
            params.push(latest);
        }
        sql.push_str(" ORDER BY ts DESC LIMIT ?");
        params.push(&limit);

        let mut stmt = conn.prepare(&sql)?;
        let messages = stmt
            .query_map(params.as_slice(), map_message)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(messages)
    }

    pub fn count_messages(&self, channel_id: &str) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE channel_id = ?1",
            [channel_id],
            |row| row.get(0),
        )
    }
}
