//! Database access layer
//!
//! SQLite holds the reader's persistent key-value settings.

pub mod init;
pub mod settings;

pub use init::{create_settings_table, init_database, init_memory_database};
