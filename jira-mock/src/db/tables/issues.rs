//! Issue database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::Issue;

fn map_issue(row: &Row) -> rusqlite::Result<Issue> {
    let created_on_str: String = row.get(5)?;

    Ok(Issue {
        id: row.get(0)?,
        key: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        summary: row.get(2)?,
        description: row.get(3)?,
        issue_type: row.get(4)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const ISSUE_COLUMNS: &str = "id, key, summary, description, issue_type, created_on";

impl Database {
    /// Insert a new issue and assign its `QA-<id>` key
    pub fn create_issue(
        &self,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> SqliteResult<Issue> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO issues (key, summary, description, issue_type, created_on)
             VALUES (NULL, ?1, ?2, ?3, ?4)",
            [summary, description, issue_type, &now],
        )?;
        let issue_id = conn.last_insert_rowid();
        let key = format!("QA-{}", issue_id);
        conn.execute("UPDATE issues SET key = ?1 WHERE id = ?2", (&key, issue_id))?;

        drop(conn);

        self.get_issue(&key).map(|opt| opt.unwrap())
    }

    /// Insert an issue carrying a caller-provided key (seed data)
    pub fn insert_seeded_issue(
        &self,
        key: Option<&str>,
        summary: &str,
        description: &str,
        issue_type: &str,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO issues (key, summary, description, issue_type, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (key, summary, description, issue_type, &now),
        )?;
        Ok(())
    }

    /// Look up an issue by its key
    pub fn get_issue(&self, key: &str) -> SqliteResult<Option<Issue>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM issues WHERE key = ?1",
            ISSUE_COLUMNS
        ))?;

        let issue = stmt.query_row([key], map_issue).ok();
        Ok(issue)
    }

    /// Newest issues first, offset/limit paginated
    pub fn list_issues(&self, limit: i64, offset: i64) -> SqliteResult<Vec<Issue>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM issues ORDER BY id DESC LIMIT ?1 OFFSET ?2",
            ISSUE_COLUMNS
        ))?;

        let issues = stmt
            .query_map([limit, offset], map_issue)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(issues)
    }

    /// Delete an issue by key, returning whether a row was removed
    pub fn delete_issue(&self, key: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM issues WHERE key = ?1", [key])?;
        Ok(rows_affected > 0)
    }

    pub fn count_issues(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))
    }

    /// Wipe the issues table and restart key numbering
    pub fn clear_issues(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM issues", [])?;
        conn.execute("DELETE FROM sqlite_sequence WHERE name = 'issues'", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::super::Database;

    fn test_db(dir: &tempfile::TempDir) -> Database {
        Database::new(dir.path().join("jira.db").to_str().unwrap()).unwrap()
    }

    #[test]
    fn create_assigns_sequential_keys() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);

        let first = db.create_issue("Login broken", "Steps to reproduce", "Bug").unwrap();
        let second = db.create_issue("Add search", "", "Task").unwrap();

        assert_eq!(first.key, format!("QA-{}", first.id));
        assert_eq!(second.id, first.id + 1);
        assert_eq!(second.key, format!("QA-{}", second.id));
    }

    #[test]
    fn get_returns_stored_fields() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);

        let created = db.create_issue("Summary", "Description", "Story").unwrap();
        let fetched = db.get_issue(&created.key).unwrap().unwrap();

        assert_eq!(fetched.summary, "Summary");
        assert_eq!(fetched.description, "Description");
        assert_eq!(fetched.issue_type, "Story");
    }

    #[test]
    fn get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);
        assert!(db.get_issue("QA-999").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);

        for i in 0..5 {
            db.create_issue(&format!("Issue {}", i), "", "Task").unwrap();
        }

        let page = db.list_issues(2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].summary, "Issue 4");
        assert_eq!(page[1].summary, "Issue 3");

        let next = db.list_issues(2, 2).unwrap();
        assert_eq!(next[0].summary, "Issue 2");
    }

    #[test]
    fn delete_removes_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);

        let issue = db.create_issue("Doomed", "", "Task").unwrap();
        assert!(db.delete_issue(&issue.key).unwrap());
        assert!(db.get_issue(&issue.key).unwrap().is_none());
        assert!(!db.delete_issue(&issue.key).unwrap());
    }

    #[test]
    fn clear_restarts_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir);

        db.create_issue("One", "", "Task").unwrap();
        db.create_issue("Two", "", "Task").unwrap();
        db.clear_issues().unwrap();
        assert_eq!(db.count_issues().unwrap(), 0);

        let fresh = db.create_issue("Fresh", "", "Task").unwrap();
        assert_eq!(fresh.key, "QA-1");
    }
}
