//! Project database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Project;

fn map_project(row: &Row) -> rusqlite::Result<Project> {
    let created_on_str: String = row.get(3)?;

    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const PROJECT_COLUMNS: &str = "id, name, description, created_on";

impl Database {
    pub fn list_projects(&self) -> SqliteResult<Vec<Project>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM projects ORDER BY id",
            PROJECT_COLUMNS
        ))?;
        let projects = stmt
            .query_map([], map_project)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(projects)
    }

    pub fn get_project(&self, id: i64) -> SqliteResult<Option<Project>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM projects WHERE id = ?1",
            PROJECT_COLUMNS
        ))?;
        Ok(stmt.query_row([id], map_project).ok())
    }

    pub fn create_project(&self, name: &str, description: Option<&str>) -> SqliteResult<Project> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO projects (name, description, created_on) VALUES (?1, ?2, ?3)",
            (name, description, &now),
        )?;
        let id = conn.last_insert_rowid();

        drop(conn);

        self.get_project(id).map(|opt| opt.unwrap())
    }
}
