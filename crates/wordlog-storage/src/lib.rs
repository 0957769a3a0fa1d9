//! Wordlog Storage Layer
//!
//! SQLite persistence for the vocabulary list.
//! One connection per store file, owned by [`Database`] and shared by clones.

mod database;
mod error;
mod maintenance;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
