//! Vocabulary store

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use wordlog_storage::Database;

use crate::entry::{word_at, VocabularyEntry};
use crate::error::VocabularyError;
use crate::query::{Pagination, SearchQuery, VocabularyPage};
use crate::Result;

pub struct VocabularyStore {
    db: Database,
}

impl VocabularyStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Record a lookup of `word` at the current time.
    pub fn upsert(&self, word: &str) -> Result<usize> {
        self.upsert_at(word, Utc::now())
    }

    /// Record a lookup of `word`. A new word starts at count 1 with
    /// `created_at = at`; a known word only has its count bumped.
    pub fn upsert_at(&self, word: &str, at: DateTime<Utc>) -> Result<usize> {
        let word = word.trim();
        if word.is_empty() {
            return Err(VocabularyError::EmptyWord);
        }

        let changed = self.db.with_connection(|conn| {
            Ok(conn.execute(
                "INSERT INTO vocabulary (word, created_at, lookup_count, is_favorite)
                 VALUES (?1, ?2, 1, 0)
                 ON CONFLICT(word) DO UPDATE SET
                     lookup_count = COALESCE(lookup_count, 1) + 1,
                     created_at = COALESCE(created_at, excluded.created_at)",
                rusqlite::params![word, at.timestamp()],
            )?)
        })?;

        tracing::debug!(word = %word, "Recorded lookup");
        Ok(changed)
    }

    /// Delete the entry for `word`, trimmed the same way as [`upsert`].
    /// Returns 0 when it was not there.
    ///
    /// [`upsert`]: VocabularyStore::upsert
    pub fn remove(&self, word: &str) -> Result<usize> {
        let word = word.trim();
        let removed = self.db.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM vocabulary WHERE word = ?1", [word])?)
        })?;

        tracing::info!(word = %word, removed, "Removed word");
        Ok(removed)
    }

    /// Flip the favorite flag. Returns 0 when the word is unknown.
    pub fn toggle_favorite(&self, word: &str) -> Result<usize> {
        let word = word.trim();
        Ok(self.db.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE vocabulary
                 SET is_favorite = CASE WHEN COALESCE(is_favorite, 0) = 0 THEN 1 ELSE 0 END
                 WHERE word = ?1",
                [word],
            )?)
        })?)
    }

    pub fn get(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let word = word.trim();
        Ok(self.db.with_connection(|conn| {
            let sql = format!(
                "SELECT {} FROM vocabulary WHERE word = ?1",
                VocabularyEntry::COLUMNS
            );
            Ok(conn
                .query_row(&sql, [word], VocabularyEntry::from_row)
                .optional()?)
        })?)
    }

    /// Newest entries first; `total` counts the whole store.
    pub fn list_page(&self, pagination: Pagination) -> Result<VocabularyPage> {
        self.search(&SearchQuery::default().paginate(pagination))
    }

    /// Every word, ascending.
    pub fn list_all_words(&self) -> Result<Vec<String>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT word FROM vocabulary ORDER BY word ASC")?;

            let words = stmt
                .query_map([], |row| word_at(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(words)
        })?)
    }

    pub fn count(&self) -> Result<u64> {
        let total: i64 = self.db.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM vocabulary", [], |row| row.get(0))?)
        })?;
        Ok(total.max(0) as u64)
    }
}

impl Clone for VocabularyStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
