//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed planner journal using Diesel ORM.

pub mod database;
pub mod journal;

pub use journal::SqliteJournal;
