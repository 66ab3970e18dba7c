//! Database model modules - extends Database with per-table methods

mod issues; // issues
