//! First-startup seeding from a JSON fixture

use rusqlite::Result as SqliteResult;

use super::Database;

impl Database {
    /// Load issues from the seed fixture when the store is empty.
    ///
    /// Returns the number of issues inserted; an unreadable or missing fixture
    /// is reported as an error and leaves the store untouched.
    pub fn seed_if_empty(&self, seed_path: &str) -> Result<usize, String> {
        let existing = self.count_issues().map_err(|e| e.to_string())?;
        if existing > 0 {
            return Ok(0);
        }

        let raw = std::fs::read_to_string(seed_path)
            .map_err(|e| format!("{}: {}", seed_path, e))?;
        let items: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| format!("{}: {}", seed_path, e))?;

        let mut inserted = 0;
        for item in &items {
            let fields = item.get("fields").cloned().unwrap_or_default();
            let summary = fields
                .get("summary")
                .and_then(|v| v.as_str())
                .unwrap_or("seed");
            let description = fields
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let issue_type = fields
                .get("issuetype")
                .and_then(|t| t.get("name"))
                .and_then(|v| v.as_str())
                .unwrap_or("Task");
            let key = item.get("key").and_then(|v| v.as_str());

            self.insert_seeded_issue(key, summary, description, issue_type)
                .map_err(|e| e.to_string())?;
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Admin reset: wipe and reseed from the fixture
    pub fn reset(&self, seed_path: &str) -> SqliteResult<()> {
        self.clear_issues()?;
        if let Err(e) = self.seed_if_empty(seed_path) {
            log::warn!("Reset completed without seed data: {}", e);
        }
        Ok(())
    }
}
