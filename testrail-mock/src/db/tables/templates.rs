//! Template database operations

use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Template;

fn map_template(row: &Row) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        is_default: row.get::<_, i64>(2)? != 0,
    })
}

impl Database {
    pub fn list_templates(&self) -> SqliteResult<Vec<Template>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, name, is_default FROM templates ORDER BY id")?;
        let templates = stmt
            .query_map([], map_template)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(templates)
    }

    pub fn insert_template(&self, name: &str, is_default: bool) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO templates (name, is_default) VALUES (?1, ?2)",
            (name, is_default as i64),
        )?;
        Ok(())
    }
}
