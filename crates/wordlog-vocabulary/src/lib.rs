//! Wordlog Vocabulary
//!
//! Every word the user looks up is recorded once, keyed by its exact text:
//! - the first lookup creates the entry with a count of 1
//! - later lookups bump the count and keep the first-seen time
//! - favorites are toggled independently of lookups
//!
//! Listing and search share one query path: typed filter clauses joined
//! by AND, one ordering, and offset/limit pagination.

mod entry;
mod error;
mod query;
mod store;

pub use entry::VocabularyEntry;
pub use error::VocabularyError;
pub use query::{Filter, Pagination, SearchQuery, SortOption, VocabularyPage, DEFAULT_PAGE_SIZE};
pub use store::VocabularyStore;

pub type Result<T> = std::result::Result<T, VocabularyError>;
