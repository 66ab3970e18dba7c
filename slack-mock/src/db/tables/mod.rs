//! Database model modules - extends Database with per-table methods

mod channels; // channels
mod files;    // files
mod messages; // messages
