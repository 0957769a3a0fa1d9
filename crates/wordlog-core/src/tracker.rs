//! Main tracker state container
//!
//! Every request from the UI lands on one of the methods here. The store
//! write and the external lookup are separate steps: a failed lookup never
//! undoes or fails the write, it is reported alongside it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wordlog_storage::Database;
use wordlog_vocabulary::{Pagination, SearchQuery, SortOption, VocabularyPage, VocabularyStore};

use crate::automation::{LookupAdapter, ScriptedBrowserLookup};
use crate::config::Config;
use crate::Result;

/// What happened to the external lookup step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ExternalLookup {
    Skipped,
    Opened(String),
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupOutcome {
    pub word: String,
    pub external: ExternalLookup,
    pub vocabulary: VocabularyPage,
}

#[derive(Clone)]
pub struct Tracker {
    config: Config,
    store: VocabularyStore,
    lookup: Arc<dyn LookupAdapter>,
}

impl Tracker {
    /// Open the store at the configured path and drive lookups with the
    /// configured browser.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        let lookup = Arc::new(ScriptedBrowserLookup::new(config.lookup_app.clone()));

        tracing::info!(
            database = %config.database_path.display(),
            lookup_app = %config.lookup_app,
            "Tracker initialized"
        );

        Ok(Self::with_parts(config, db, lookup))
    }

    pub fn with_parts(config: Config, db: Database, lookup: Arc<dyn LookupAdapter>) -> Self {
        Self {
            config,
            store: VocabularyStore::new(db),
            lookup,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    fn page_size_or_default(&self, page_size: Option<i64>) -> i64 {
        page_size.unwrap_or(i64::from(self.config.page_size))
    }

    // === Lookups ===

    /// Record `word`, optionally show it in the external app, and return the
    /// first page of the list.
    pub async fn lookup(
        &self,
        word: &str,
        open_external: bool,
        page_size: Option<i64>,
    ) -> Result<LookupOutcome> {
        self.store.upsert(word)?;
        let word = word.trim().to_string();
        tracing::info!(word = %word, "Word added/updated");

        let external = if open_external {
            match self.lookup.lookup(&word).await {
                Ok(message) => ExternalLookup::Opened(message),
                Err(e) => ExternalLookup::Failed(e.to_string()),
            }
        } else {
            ExternalLookup::Skipped
        };

        let vocabulary = self.list_page(1, self.page_size_or_default(page_size))?;

        Ok(LookupOutcome {
            word,
            external,
            vocabulary,
        })
    }

    /// Record `word` and return the whole list.
    pub fn add(&self, word: &str) -> Result<VocabularyPage> {
        self.store.upsert(word)?;
        tracing::info!(word = %word.trim(), "Word added");
        Ok(self.store.list_page(Pagination::unbounded())?)
    }

    // === Listing ===

    pub fn list_page(&self, page: i64, page_size: i64) -> Result<VocabularyPage> {
        Ok(self.store.list_page(Pagination::new(page, page_size))?)
    }

    pub fn search(
        &self,
        term: &str,
        page: i64,
        page_size: i64,
        sort: SortOption,
        favorites_only: bool,
    ) -> Result<VocabularyPage> {
        let query = SearchQuery::new(term)
            .sort(sort)
            .favorites_only(favorites_only)
            .paginate(Pagination::new(page, page_size));
        Ok(self.store.search(&query)?)
    }

    pub fn list_all_words(&self) -> Result<Vec<String>> {
        Ok(self.store.list_all_words()?)
    }

    // === Mutations ===

    /// Returns true when an entry was deleted.
    pub fn remove(&self, word: &str) -> Result<bool> {
        Ok(self.store.remove(word)? > 0)
    }

    /// Flip the favorite flag and return the refreshed first page.
    pub fn toggle_favorite(&self, word: &str, page_size: Option<i64>) -> Result<VocabularyPage> {
        let changed = self.store.toggle_favorite(word)?;
        if changed == 0 {
            tracing::warn!(word = %word, "Toggled favorite on unknown word");
        }
        self.list_page(1, self.page_size_or_default(page_size))
    }

    // === Store maintenance ===

    pub fn reset(&self) -> Result<()> {
        self.store.database().reset()?;
        Ok(())
    }

    /// Copy the store to the configured export location.
    pub fn export_store(&self) -> Result<PathBuf> {
        self.export_store_to(self.config.export_path())
    }

    pub fn export_store_to<P: AsRef<Path>>(&self, destination: P) -> Result<PathBuf> {
        Ok(self.store.database().export_to(destination)?)
    }

    pub fn import_store<P: AsRef<Path>>(&self, source: P) -> Result<()> {
        self.store.database().import_from(source)?;
        Ok(())
    }

    /// Recover after a reset or import left the store closed.
    pub fn reopen(&self) -> Result<()> {
        self.store.database().reopen()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::AutomationError;
    use crate::CoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wordlog_vocabulary::VocabularyError;

    /// Records every word it is asked to look up.
    struct FakeLookup {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LookupAdapter for FakeLookup {
        async fn lookup(&self, word: &str) -> std::result::Result<String, AutomationError> {
            self.calls.lock().unwrap().push(word.to_string());
            if self.fail {
                Err(AutomationError::Failed("browser not running".to_string()))
            } else {
                Ok("Success".to_string())
            }
        }
    }

    fn tracker_with(fail: bool) -> (Tracker, Arc<FakeLookup>) {
        let fake = Arc::new(FakeLookup {
            fail,
            calls: Mutex::new(Vec::new()),
        });
        let config = Config::new(PathBuf::from("/nonexistent/wordlog"));
        let tracker = Tracker::with_parts(
            config,
            Database::open_in_memory().unwrap(),
            fake.clone(),
        );
        (tracker, fake)
    }

    #[tokio::test]
    async fn test_lookup_without_external_app() {
        let (tracker, fake) = tracker_with(false);

        let outcome = tracker.lookup("apple", false, Some(5)).await.unwrap();
        assert_eq!(outcome.external, ExternalLookup::Skipped);
        assert_eq!(outcome.vocabulary.words(), vec!["apple"]);
        assert_eq!(outcome.vocabulary.page_size, Some(5));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_opens_external_app() {
        let (tracker, fake) = tracker_with(false);

        let outcome = tracker.lookup(" apple ", true, None).await.unwrap();
        assert_eq!(outcome.word, "apple");
        assert_eq!(outcome.external, ExternalLookup::Opened("Success".to_string()));
        assert_eq!(outcome.vocabulary.page_size, Some(10));
        assert_eq!(fake.calls(), vec!["apple"]);
    }

    #[tokio::test]
    async fn test_failed_external_lookup_keeps_word() {
        let (tracker, _) = tracker_with(true);

        let outcome = tracker.lookup("apple", true, Some(10)).await.unwrap();
        assert_eq!(
            outcome.external,
            ExternalLookup::Failed("browser not running".to_string())
        );
        assert_eq!(outcome.vocabulary.total, 1);

        tracker.lookup("apple", true, Some(10)).await.unwrap();
        let entry = tracker.store().get("apple").unwrap().unwrap();
        assert_eq!(entry.lookup_count, 2);
    }

    #[tokio::test]
    async fn test_lookup_empty_word_fails_before_external_app() {
        let (tracker, fake) = tracker_with(false);

        let result = tracker.lookup("  ", true, None).await;
        assert!(matches!(
            result,
            Err(CoreError::Vocabulary(VocabularyError::EmptyWord))
        ));
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn test_add_returns_whole_list() {
        let (tracker, _) = tracker_with(false);
        for i in 0..15 {
            tracker.add(&format!("word{i:02}")).unwrap();
        }

        let page = tracker.add("final").unwrap();
        assert_eq!(page.entries.len(), 16);
        assert_eq!(page.total, 16);
        assert_eq!(page.page_size, None);
    }

    #[test]
    fn test_toggle_favorite_returns_first_page() {
        let (tracker, _) = tracker_with(false);
        tracker.add("apple").unwrap();

        let page = tracker.toggle_favorite("apple", Some(10)).unwrap();
        assert!(page.entries[0].is_favorite);

        let page = tracker.toggle_favorite("missing", None).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_remove_reports_whether_deleted() {
        let (tracker, _) = tracker_with(false);
        tracker.add("apple").unwrap();

        assert!(tracker.remove("apple").unwrap());
        assert!(!tracker.remove("apple").unwrap());
    }

    #[test]
    fn test_search_and_listing() {
        let (tracker, _) = tracker_with(false);
        for word in ["apple", "banana", "cherry"] {
            tracker.add(word).unwrap();
        }

        assert_eq!(
            tracker.list_all_words().unwrap(),
            vec!["apple", "banana", "cherry"]
        );

        let page = tracker
            .search("an", 1, 10, SortOption::AlphaAsc, false)
            .unwrap();
        assert_eq!(page.words(), vec!["banana"]);

        let page = tracker.list_page(0, 2).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (tracker, _) = tracker_with(false);
        tracker.add("apple").unwrap();

        tracker.reset().unwrap();

        let page = tracker.list_page(1, 10).unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_export_import_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().join("data"));
        config.export_dir = dir.path().join("exports");
        let tracker = Tracker::new(config).unwrap();

        let at = |secs| chrono::DateTime::from_timestamp(secs, 0).unwrap();
        tracker.store().upsert_at("apple", at(100)).unwrap();
        tracker.store().upsert_at("apple", at(200)).unwrap();
        tracker.store().upsert_at("banana", at(300)).unwrap();
        tracker.store().toggle_favorite("banana").unwrap();
        let before = tracker.list_page(1, 10).unwrap();

        let backup = tracker.export_store().unwrap();
        assert_eq!(backup, dir.path().join("exports/vocabulary_backup.sqlite"));

        tracker.reset().unwrap();
        assert_eq!(tracker.list_page(1, 10).unwrap().total, 0);

        tracker.import_store(&backup).unwrap();
        let after = tracker.list_page(1, 10).unwrap();
        assert_eq!(after, before);
        assert_eq!(after.entries[1].lookup_count, 2);
        assert_eq!(after.entries[1].created_at_secs(), 100);
        assert!(after.entries[0].is_favorite);
    }

    #[test]
    fn test_external_lookup_serialization() {
        let json = serde_json::to_value(ExternalLookup::Failed("nope".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "message": "nope"}));

        let json = serde_json::to_value(ExternalLookup::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({"status": "skipped"}));
    }
}
