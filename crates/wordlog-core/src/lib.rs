//! Wordlog Core
//!
//! Central coordination layer: configuration, logging, the external
//! dictionary lookup, and the [`Tracker`] every UI request goes through.

mod automation;
mod config;
mod error;
mod tracker;

pub use automation::{AutomationError, LookupAdapter, ScriptedBrowserLookup};
pub use config::Config;
pub use error::CoreError;
pub use tracker::{ExternalLookup, LookupOutcome, Tracker};

// Re-export core components
pub use wordlog_storage::{Database, StorageError};
pub use wordlog_vocabulary::{
    Pagination, SearchQuery, SortOption, VocabularyEntry, VocabularyError, VocabularyPage,
    VocabularyStore, DEFAULT_PAGE_SIZE,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
