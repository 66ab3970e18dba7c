//! Test case database operations
//!
//! Cases hang off sections; project-level queries go through a join. Steps are
//! stored as a JSON column.

use chrono::{DateTime, Utc};
use rusqlite::{Result as SqliteResult, Row, ToSql};

use super::super::Database;
use crate::models::{CaseDraft, CasePatch, TestCase};

pub(crate) fn map_case(row: &Row) -> rusqlite::Result<TestCase> {
    let steps_json: Option<String> = row.get(6)?;
    let created_on_str: String = row.get(9)?;
    let updated_on_str: String = row.get(10)?;

    Ok(TestCase {
        id: row.get(0)?,
        section_id: row.get(1)?,
        title: row.get(2)?,
        template_id: row.get(3)?,
        type_id: row.get(4)?,
        priority_id: row.get(5)?,
        steps: steps_json.and_then(|s| serde_json::from_str(&s).ok()),
        expected_result: row.get(7)?,
        preconditions: row.get(8)?,
        created_on: DateTime::parse_from_rfc3339(&created_on_str)
            .unwrap()
            .with_timezone(&Utc),
        updated_on: DateTime::parse_from_rfc3339(&updated_on_str)
            .unwrap()
            .with_timezone(&Utc),
    })
}

const CASE_COLUMNS: &str = "c.id, c.section_id, c.title, c.template_id, c.type_id, \
     c.priority_id, c.steps, c.expected_result, c.preconditions, c.created_on, c.updated_on";

/// Optional filters applied to project-level case queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFilter {
    pub section_id: Option<i64>,
    pub type_id: Option<i64>,
    pub priority_id: Option<i64>,
}

impl CaseFilter {
    fn clauses(&self) -> (String, Vec<&dyn ToSql>) {
        let mut sql = String::new();
        let mut params: Vec<&dyn ToSql> = Vec::new();
        if let Some(ref section_id) = self.section_id {
            sql.push_str(" AND c.section_id = ?");
            params.push(section_id);
        }
        if let Some(ref type_id) = self.type_id {
            sql.push_str(" AND c.type_id = ?");
            params.push(type_id);
        }
        if let Some(ref priority_id) = self.priority_id {
            sql.push_str(" AND c.priority_id = ?");
            params.push(priority_id);
        }
        (sql, params)
    }
}

impl Database {
    pub fn create_case(&self, section_id: i64, draft: &CaseDraft) -> SqliteResult<TestCase> {
        let steps_json = draft
            .steps
            .as_ref()
            .map(|s| serde_json::to_string(s).unwrap_or_default());

        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO cases (section_id, title, template_id, type_id, priority_id,
                                steps, expected_result, preconditions, created_on, updated_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            (
                section_id,
                &draft.title,
                draft.template_id,
                draft.type_id,
                draft.priority_id,
                steps_json,
                draft.expected_result.as_deref(),
                draft.preconditions.as_deref(),
                &now,
            ),
        )?;
        let id = conn.last_insert_rowid();

        drop(conn);

        self.get_case(id).map(|opt| opt.unwrap())
    }

    pub fn get_case(&self, id: i64) -> SqliteResult<Option<TestCase>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cases c WHERE c.id = ?1",
            CASE_COLUMNS
        ))?;
        Ok(stmt.query_row([id], map_case).ok())
    }

    /// Cases of a project (via their sections), filtered and paginated
    pub fn list_cases(
        &self,
        project_id: i64,
        filter: &CaseFilter,
        limit: i64,
        offset: i64,
    ) -> SqliteResult<Vec<TestCase>> {
        let conn = self.conn.lock().unwrap();

        let (filter_sql, filter_params) = filter.clauses();
        let sql = format!(
            "SELECT {} FROM cases c JOIN sections s ON c.section_id = s.id
             WHERE s.project_id = ?{} ORDER BY c.id LIMIT ? OFFSET ?",
            CASE_COLUMNS, filter_sql
        );
        let mut params: Vec<&dyn ToSql> = vec![&project_id];
        params.extend(filter_params);
        params.push(&limit);
        params.push(&offset);

        let mut stmt = conn.prepare(&sql)?;
        let cases = stmt
            .query_map(params.as_slice(), map_case)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(cases)
    }

    pub fn count_cases(&self, project_id: i64, filter: &CaseFilter) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();

        let (filter_sql, filter_params) = filter.clauses();
        let sql = format!(
            "SELECT COUNT(*) FROM cases c JOIN sections s ON c.section_id = s.id
             WHERE s.project_id = ?{}",
            filter_sql
        );
        let mut params: Vec<&dyn ToSql> = vec![&project_id];
        params.extend(filter_params);

        conn.query_row(&sql, params.as_slice(), |row| row.get(0))
    }

    pub fn count_cases_in_section(&self, section_id: i64) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM cases WHERE section_id = ?1",
            [section_id],
            |row| row.get(0),
        )
    }

    /// Partial update: only keys present in the patch are written, and
    /// `updated_on` is refreshed. Returns the updated row, None when absent.
    pub fn update_case(&self, id: i64, patch: &CasePatch) -> SqliteResult<Option<TestCase>> {
        let steps_json = patch
            .steps
            .as_ref()
            .map(|s| serde_json::to_string(s).unwrap_or_default());
        let now = Utc::now().to_rfc3339();

        let affected = {
            let conn = self.conn.lock().unwrap();

            let mut sets: Vec<&str> = Vec::new();
            let mut params: Vec<&dyn ToSql> = Vec::new();
            if let Some(ref title) = patch.title {
                sets.push("title = ?");
                params.push(title);
            }
            if let Some(ref template_id) = patch.template_id {
                sets.push("template_id = ?");
                params.push(template_id);
            }
            if let Some(ref type_id) = patch.type_id {
                sets.push("type_id = ?");
                params.push(type_id);
            }
            if let Some(ref priority_id) = patch.priority_id {
                sets.push("priority_id = ?");
                params.push(priority_id);
            }
            if let Some(ref steps) = steps_json {
                sets.push("steps = ?");
                params.push(steps);
            }
            if let Some(ref expected_result) = patch.expected_result {
                sets.push("expected_result = ?");
                params.push(expected_result);
            }
            if let Some(ref preconditions) = patch.preconditions {
                sets.push("preconditions = ?");
                params.push(preconditions);
            }
            sets.push("updated_on = ?");
            params.push(&now);
            params.push(&id);

            let sql = format!("UPDATE cases SET {} WHERE id = ?", sets.join(", "));
            conn.execute(&sql, params.as_slice())?
        };

        if affected == 0 {
            return Ok(None);
        }
        self.get_case(id)
    }

    /// Delete a case; results and run entries cascade away with it
    pub fn delete_case(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM cases WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }
}
