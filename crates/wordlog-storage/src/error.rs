//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database is closed")]
    Closed,

    #[error("Database is not backed by a file")]
    NotFileBacked,

    #[error("Invalid import file: {0}")]
    InvalidImport(String),
}
