//! Demo seed data, inserted on first startup when the store is empty

use rusqlite::Result as SqliteResult;
use std::time::{SystemTime, UNIX_EPOCH};

use super::Database;

impl Database {
    /// Seed demo channels and messages. Returns whether anything was inserted;
    /// a non-empty store is left untouched.
    pub fn seed_if_empty(&self) -> SqliteResult<bool> {
        if self.count_channels()? > 0 {
            return Ok(false);
        }

        self.create_channel(
            "C1234567890",
            "qa-reports",
            "Quality Assurance Reports and Updates",
            "Channel for sharing QA test results and automation reports",
        )?;
        self.create_channel(
            "C0987654321",
            "general",
            "General Discussion",
            "Company-wide announcements and general discussion",
        )?;

        let base_ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let seed_messages: [(u64, &str, &str, &str); 5] = [
            (3600, "C1234567890", "U1111111111", "Test automation run completed successfully! All 47 tests passed."),
            (3000, "C1234567890", "U2222222222", "Found a critical bug in the login flow. Creating JIRA ticket now."),
            (1800, "C1234567890", "U1111111111", "Bug has been logged as QA-123. TestRail case updated with failure details."),
            (900, "C0987654321", "U3333333333", "Good morning team! Don't forget about the sprint retrospective at 2 PM."),
            (300, "C0987654321", "U2222222222", "Thanks for the reminder! I'll be there."),
        ];

        for (i, (age, channel_id, user, text)) in seed_messages.iter().enumerate() {
            let ts = format!("{}.{:06}", base_ts - age, (i + 1) * 100);
            self.insert_message(&ts, channel_id, user, text, None)?;
        }

        Ok(true)
    }
}
