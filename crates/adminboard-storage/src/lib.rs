//! Adminboard Storage Layer
//!
//! SQLite-backed key/value persistence for credentials.
//! Entries survive process restarts; every write is a single statement.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
