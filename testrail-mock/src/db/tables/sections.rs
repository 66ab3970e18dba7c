//! Section database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Section;

fn map_section(row: &Row) -> rusqlite::Result<Section> {
    let created_on_str: String = row.get(5)?;

    Ok(Section {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        parent_id: row.get(4)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const SECTION_COLUMNS: &str = "id, project_id, name, description, parent_id, created_on";

impl Database {
    pub fn list_sections(&self, project_id: i64) -> SqliteResult<Vec<Section>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sections WHERE project_id = ?1 ORDER BY id",
            SECTION_COLUMNS
        ))?;
        let sections = stmt
            .query_map([project_id], map_section)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(sections)
    }

    pub fn get_section(&self, id: i64) -> SqliteResult<Option<Section>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sections WHERE id = ?1",
            SECTION_COLUMNS
        ))?;
        Ok(stmt.query_row([id], map_section).ok())
    }

    pub fn create_section(
        &self,
        project_id: i64,
        name: &str,
        description: Option<&str>,
        parent_id: Option<i64>,
    ) -> SqliteResult<Section> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO sections (project_id, name, description, parent_id, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (project_id, name, description, parent_id, &now),
        )?;
        let id = conn.last_insert_rowid();

        drop(conn);

        self.get_section(id).map(|opt| opt.unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::Database;

    #[test]
    fn sections_belong_to_their_project() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("testrail.db").to_str().unwrap()).unwrap();

        let p1 = db.create_project("One", None).unwrap();
        let p2 = db.create_project("Two", None).unwrap();
        db.create_section(p1.id, "Auth", Some("login tests"), None).unwrap();
        db.create_section(p2.id, "API", None, None).unwrap();

        let sections = db.list_sections(p1.id).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Auth");
    }

    #[test]
    fn nested_sections_keep_their_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("testrail.db").to_str().unwrap()).unwrap();

        let project = db.create_project("Demo", None).unwrap();
        let parent = db.create_section(project.id, "UI", None, None).unwrap();
        let child = db
            .create_section(project.id, "Forms", None, Some(parent.id))
            .unwrap();
        assert_eq!(child.parent_id, Some(parent.id));
    }
}
