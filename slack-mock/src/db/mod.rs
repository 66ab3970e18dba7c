mod seed;
mod sqlite;
mod tables;

pub use sqlite::Database;
