//! Test result database operations

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row};

use super::super::Database;
use crate::models::TestResult;

fn map_result(row: &Row) -> rusqlite::Result<TestResult> {
    let created_on_str: String = row.get(5)?;

    Ok(TestResult {
        id: row.get(0)?,
        case_id: row.get(1)?,
        status_id: row.get(2)?,
        comment: row.get(3)?,
        elapsed: row.get(4)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
        created_by: row.get(6)?,
    })
}

const RESULT_COLUMNS: &str = "id, case_id, status_id, comment, elapsed, created_on, created_by";

impl Database {
    pub fn create_result(
        &self,
        case_id: i64,
        status_id: i64,
        comment: Option<&str>,
        elapsed: Option<&str>,
    ) -> SqliteResult<TestResult> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO results (case_id, status_id, comment, elapsed, created_on, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5, 'mock-user')",
            (case_id, status_id, comment, elapsed, &now),
        )?;
        let id = conn.last_insert_rowid();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM results WHERE id = ?1",
            RESULT_COLUMNS
        ))?;
        stmt.query_row([id], map_result)
    }

    /// Execution history of a case, newest first
    pub fn list_results(&self, case_id: i64, limit: i64) -> SqliteResult<Vec<TestResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM results WHERE case_id = ?1 ORDER BY created_on DESC, id DESC LIMIT ?2",
            RESULT_COLUMNS
        ))?;
        let results = stmt
            .query_map([case_id, limit], map_result)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(results)
    }

    pub fn latest_result(&self, case_id: i64) -> SqliteResult<Option<TestResult>> {
        Ok(self.list_results(case_id, 1)?.into_iter().next())
    }

    /// Most recent results across all cases (dashboard)
    pub fn recent_results(&self, limit: i64) -> SqliteResult<Vec<TestResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM results ORDER BY created_on DESC, id DESC LIMIT ?1",
            RESULT_COLUMNS
        ))?;
        let results = stmt
            .query_map([limit], map_result)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(results)
    }

    /// Status ids of every result recorded against a section's cases
    pub fn result_statuses_in_section(&self, section_id: i64) -> SqliteResult<Vec<i64>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.status_id FROM results r
             JOIN cases c ON r.case_id = c.id
             WHERE c.section_id = ?1",
        )?;
        let statuses = stmt
            .query_map([section_id], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(statuses)
    }
}
