//! Database module
//!
//! SQLite storage backing the profile source and allergen registry.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
pub use migrations::run_migrations;
