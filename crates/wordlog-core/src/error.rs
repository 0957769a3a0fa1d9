//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] wordlog_storage::StorageError),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] wordlog_vocabulary::VocabularyError),

    #[error("Lookup failed: {0}")]
    Automation(#[from] crate::automation::AutomationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tracker not initialized")]
    NotInitialized,
}
