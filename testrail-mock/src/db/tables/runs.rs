//! Test run and run entry database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::{RunEntry, TestRun, STATUS_UNTESTED};

fn map_run(row: &Row) -> rusqlite::Result<TestRun> {
    let created_on_str: String = row.get(4)?;

    Ok(TestRun {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
        is_completed: row.get::<_, i64>(5)? != 0,
    })
}

fn map_entry(row: &Row) -> rusqlite::Result<RunEntry> {
    Ok(RunEntry {
        id: row.get(0)?,
        run_id: row.get(1)?,
        case_id: row.get(2)?,
        status_id: row.get(3)?,
        comment: row.get(4)?,
        elapsed: row.get(5)?,
    })
}

const RUN_COLUMNS: &str = "id, project_id, name, description, created_on, is_completed";

impl Database {
    pub fn create_run(
        &self,
        project_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> SqliteResult<TestRun> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (project_id, name, description, created_on) VALUES (?1, ?2, ?3, ?4)",
            (project_id, name, description, &now),
        )?;
        let id = conn.last_insert_rowid();

        drop(conn);

        self.get_run(id).map(|opt| opt.unwrap())
    }

    pub fn get_run(&self, id: i64) -> SqliteResult<Option<TestRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS))?;
        Ok(stmt.query_row([id], map_run).ok())
    }

    pub fn list_runs(&self, project_id: i64) -> SqliteResult<Vec<TestRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM runs WHERE project_id = ?1 ORDER BY id",
            RUN_COLUMNS
        ))?;
        let runs = stmt
            .query_map([project_id], map_run)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(runs)
    }

    /// Most recently created runs of a project (dashboard, runs page)
    pub fn recent_runs(&self, project_id: i64, limit: i64) -> SqliteResult<Vec<TestRun>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM runs WHERE project_id = ?1 ORDER BY created_on DESC, id DESC LIMIT ?2",
            RUN_COLUMNS
        ))?;
        let runs = stmt
            .query_map([project_id, limit], map_run)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(runs)
    }

    pub fn update_run(&self, id: i64, name: &str, description: Option<&str>) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute(
            "UPDATE runs SET name = ?1, description = ?2 WHERE id = ?3",
            (name, description, id),
        )?;
        Ok(rows_affected > 0)
    }

    pub fn complete_run(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("UPDATE runs SET is_completed = 1 WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    /// Add a case to a run as untested; duplicates are skipped
    pub fn add_run_entry(&self, run_id: i64, case_id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();

        let exists: i64 = conn.query_row(
            "SELECT COUNT(*) FROM run_entries WHERE run_id = ?1 AND case_id = ?2",
            [run_id, case_id],
            |row| row.get(0),
        )?;
        if exists > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO run_entries (run_id, case_id, status_id) VALUES (?1, ?2, ?3)",
            [run_id, case_id, STATUS_UNTESTED],
        )?;
        Ok(true)
    }

    /// Entries joined with their case titles (run detail page)
    pub fn list_run_entries_with_titles(
        &self,
        run_id: i64,
    ) -> SqliteResult<Vec<(RunEntry, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT e.id, e.run_id, e.case_id, e.status_id, e.comment, e.elapsed, c.title
             FROM run_entries e JOIN cases c ON e.case_id = c.id
             WHERE e.run_id = ?1 ORDER BY e.id",
        )?;
        let entries = stmt
            .query_map([run_id], |row| Ok((map_entry(row)?, row.get::<_, String>(6)?)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Project cases not yet part of the run (add-cases page)
    pub fn list_cases_not_in_run(
        &self,
        project_id: i64,
        run_id: i64,
    ) -> SqliteResult<Vec<crate::models::TestCase>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.section_id, c.title, c.template_id, c.type_id, c.priority_id,
                    c.steps, c.expected_result, c.preconditions, c.created_on, c.updated_on
             FROM cases c JOIN sections s ON c.section_id = s.id
             WHERE s.project_id = ?1
               AND c.id NOT IN (SELECT case_id FROM run_entries WHERE run_id = ?2)
             ORDER BY c.id",
        )?;
        let cases = stmt
            .query_map([project_id, run_id], super::cases::map_case)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(cases)
    }

}

#[cfg(test)]
mod tests {
    use super::super::super::Database;
    use crate::models::CaseDraft;

    fn fixture(dir: &tempfile::TempDir) -> (Database, i64, i64, i64) {
        let db = Database::new(dir.path().join("testrail.db").to_str().unwrap()).unwrap();
        let project = db.create_project("Demo", None).unwrap();
        let section = db.create_section(project.id, "Auth", None, None).unwrap();
        let case = db
            .create_case(
                section.id,
                &CaseDraft {
                    title: "Login".to_string(),
                    template_id: 1,
                    type_id: 1,
                    priority_id: 2,
                    steps: None,
                    expected_result: None,
                    preconditions: None,
                },
            )
            .unwrap();
        (db, project.id, section.id, case.id)
    }

    #[test]
    fn run_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let (db, project_id, _, _) = fixture(&dir);

        let run = db.create_run(project_id, "Sprint 1", Some("regression")).unwrap();
        assert!(!run.is_completed);

        assert!(db.update_run(run.id, "Sprint 1 (final)", None).unwrap());
        assert!(db.complete_run(run.id).unwrap());

        let updated = db.get_run(run.id).unwrap().unwrap();
        assert_eq!(updated.name, "Sprint 1 (final)");
        assert!(updated.is_completed);
        assert!(updated.description.is_none());
    }

    #[test]
    fn entries_default_untested_and_skip_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let (db, project_id, _, case_id) = fixture(&dir);
        let run = db.create_run(project_id, "Run", None).unwrap();

        assert!(db.add_run_entry(run.id, case_id).unwrap());
        assert!(!db.add_run_entry(run.id, case_id).unwrap());

        let entries = db.list_run_entries_with_titles(run.id).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.status_id, 3);
        assert_eq!(entries[0].1, "Login");
    }

    #[test]
    fn available_cases_exclude_run_members() {
        let dir = tempfile::tempdir().unwrap();
        let (db, project_id, section_id, case_id) = fixture(&dir);
        let spare = db
            .create_case(
                section_id,
                &CaseDraft {
                    title: "Logout".to_string(),
                    template_id: 1,
                    type_id: 1,
                    priority_id: 2,
                    steps: None,
                    expected_result: None,
                    preconditions: None,
                },
            )
            .unwrap();
        let run = db.create_run(project_id, "Run", None).unwrap();
        db.add_run_entry(run.id, case_id).unwrap();

        let available = db.list_cases_not_in_run(project_id, run.id).unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, spare.id);
    }
}
