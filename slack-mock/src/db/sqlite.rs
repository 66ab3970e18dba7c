//! SQLite database - schema definitions and connection management
//!
//! Row-level operations live in the tables/ subdirectory; seeding in seed.rs.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Main database wrapper with connection pooling via Mutex
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        // Cascades (channel -> messages -> files) depend on this pragma
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS channels (
                id TEXT PRIMARY KEY,
                name TEXT UNIQUE NOT NULL,
                topic TEXT NOT NULL DEFAULT '',
                purpose TEXT NOT NULL DEFAULT '',
                is_private INTEGER NOT NULL DEFAULT 0,
                created_on TEXT NOT NULL,
                updated_on TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ts TEXT UNIQUE NOT NULL,
                channel_id TEXT NOT NULL,
                user TEXT NOT NULL,
                text TEXT NOT NULL,
                thread_ts TEXT,
                created_on TEXT NOT NULL,
                FOREIGN KEY (channel_id) REFERENCES channels(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS files (
                id TEXT PRIMARY KEY,
                message_id INTEGER,
                name TEXT NOT NULL,
                title TEXT,
                mimetype TEXT NOT NULL,
                filetype TEXT NOT NULL,
                size INTEGER NOT NULL,
                url_private TEXT NOT NULL,
                permalink TEXT NOT NULL,
                created_on TEXT NOT NULL,
                FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
            )",
            [],
        )?;

        Ok(())
    }
}
