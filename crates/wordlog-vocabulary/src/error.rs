//! Vocabulary error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("Storage error: {0}")]
    Storage(#[from] wordlog_storage::StorageError),

    #[error("Word cannot be empty")]
    EmptyWord,
}
