//! File record database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};
use std::time::{SystemTime, UNIX_EPOCH};

use super::super::Database;
use crate::models::SlackFile;

fn map_file(row: &Row) -> rusqlite::Result<SlackFile> {
    let created_on_str: String = row.get(9)?;

    Ok(SlackFile {
        id: row.get(0)?,
        message_id: row.get(1)?,
        name: row.get(2)?,
        title: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        mimetype: row.get(4)?,
        filetype: row.get(5)?,
        size: row.get(6)?,
        url_private: row.get(7)?,
        permalink: row.get(8)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const FILE_COLUMNS: &str =
    "id, message_id, name, title, mimetype, filetype, size, url_private, permalink, created_on";

impl Database {
    /// Record an upload. Ids follow the `F<epoch><hex>` convention.
    pub fn create_file(
        &self,
        name: &str,
        title: Option<&str>,
        mimetype: &str,
        filetype: &str,
        size: i64,
        message_id: Option<i64>,
    ) -> SqliteResult<SlackFile> {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let file_id = format!("F{}{:08x}", epoch, rand::random::<u32>());
        let url_private = format!("https://files.slack.com/files-pri/{}/{}", file_id, name);
        let permalink = format!("https://mockslack.slack.com/files/{}", file_id);

        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO files (id, message_id, name, title, mimetype, filetype, size, url_private, permalink, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            (
                &file_id,
                message_id,
                name,
                title.unwrap_or(name),
                mimetype,
                filetype,
                size,
                &url_private,
                &permalink,
                &now,
            ),
        )?;

        drop(conn);

        self.get_file(&file_id).map(|opt| opt.unwrap())
    }

    pub fn get_file(&self, id: &str) -> SqliteResult<Option<SlackFile>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM files WHERE id = ?1", FILE_COLUMNS))?;
        Ok(stmt.query_row([id], map_file).ok())
    }
}
