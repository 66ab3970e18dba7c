//! Channel database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Channel;

pub(crate) fn map_channel(row: &Row) -> rusqlite::Result<Channel> {
    let created_on_str: String = row.get(5)?;
    let updated_on_str: String = row.get(6)?;

    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        topic: row.get(2)?,
        purpose: row.get(3)?,
        is_private: row.get::<_, i64>(4)? != 0,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
        updated_on: DateTime::parse_from_rfc3339(&updated_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const CHANNEL_COLUMNS: &str = "id, name, topic, purpose, is_private, created_on, updated_on";

impl Database {
    pub fn create_channel(
        &self,
        id: &str,
        name: &str,
        topic: &str,
        purpose: &str,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO channels (id, name, topic, purpose, is_private, created_on, updated_on)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            (id, name, topic, purpose, &now),
        )?;
        Ok(())
    }

    pub fn get_channel_by_name(&self, name: &str) -> SqliteResult<Option<Channel>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM channels WHERE name = ?1",
            CHANNEL_COLUMNS
        ))?;
        Ok(stmt.query_row([name], map_channel).ok())
    }

    pub fn get_channel_by_id(&self, id: &str) -> SqliteResult<Option<Channel>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM channels WHERE id = ?1",
            CHANNEL_COLUMNS
        ))?;
        Ok(stmt.query_row([id], map_channel).ok())
    }

    /// Resolve a channel reference the way the API accepts it: name first,
    /// then id.
    pub fn resolve_channel(&self, name_or_id: &str) -> SqliteResult<Option<Channel>> {
        if let Some(channel) = self.get_channel_by_name(name_or_id)? {
            return Ok(Some(channel));
        }
        self.get_channel_by_id(name_or_id)
    }

    pub fn list_channels(&self) -> SqliteResult<Vec<Channel>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM channels ORDER BY name",
            CHANNEL_COLUMNS
        ))?;
        let channels = stmt
            .query_map([], map_channel)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(channels)
    }

    pub fn count_channels(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM channels", [], |row| row.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::Database;

    fn test_db(dir: &tempfile::TempDir) -> Database {
        Database::new(dir.path().join("slack.db").to_str().unwrap()).unwrap()
    }

    #[test]
    fn resolve_prefers_name_then_id() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);
        db.create_channel("C111", "general", "", "").unwrap();

        assert_eq!(db.resolve_channel("general").unwrap().unwrap().id, "C111");
        assert_eq!(db.resolve_channel("C111").unwrap().unwrap().name, "general");
        assert!(db.resolve_channel("nope").unwrap().is_none());
    }

    #[test]
    fn deleting_channel_cascades_messages() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);
        db.create_channel("C111", "general", "", "").unwrap();
        db.create_message("C111", "U1", "hello", None).unwrap();
        db.create_message("C111", "U2", "world", None).unwrap();

        db.conn
            .lock()
            .unwrap()
            .execute("DELETE FROM channels WHERE id = 'C111'", [])
            .unwrap();
        assert_eq!(db.count_messages("C111").unwrap(), 0);
    }
}
