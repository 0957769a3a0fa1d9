//! Vocabulary entry model

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// One recorded word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub word: String,
    /// First time the word was recorded. Stored as whole seconds.
    pub created_at: DateTime<Utc>,
    pub lookup_count: i64,
    pub is_favorite: bool,
}

impl VocabularyEntry {
    pub(crate) const COLUMNS: &'static str = "word, created_at, lookup_count, is_favorite";

    /// Map a row selected with [`VocabularyEntry::COLUMNS`].
    ///
    /// The table carries no type constraints, so rows written by other tools
    /// may hold NULLs or text where numbers belong. A NULL word reads as "",
    /// an unreadable timestamp as the epoch, a missing count as 1.
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            word: word_at(row, 0)?,
            created_at: from_timestamp(integer_at(row, 1)?.unwrap_or(0)),
            lookup_count: integer_at(row, 2)?.unwrap_or(1),
            is_favorite: integer_at(row, 3)?.unwrap_or(0) != 0,
        })
    }

    pub fn created_at_secs(&self) -> i64 {
        self.created_at.timestamp()
    }

    pub fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Read a word column of any storage class.
pub(crate) fn word_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}

/// Read an integer column leniently. `None` when the value has no
/// integer reading.
fn integer_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => parse_integer(&String::from_utf8_lossy(t)),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Accepts plain numbers and the two date forms SQLite itself writes.
fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(i) = text.parse::<i64>() {
        return Some(i);
    }
    if let Ok(f) = text.parse::<f64>() {
        return Some(f as i64);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_columns_use_defaults() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let entry = conn
            .query_row(
                "SELECT 'orphan', NULL, NULL, NULL",
                [],
                VocabularyEntry::from_row,
            )
            .unwrap();

        assert_eq!(entry.word, "orphan");
        assert_eq!(entry.created_at_secs(), 0);
        assert_eq!(entry.lookup_count, 1);
        assert!(!entry.is_favorite);
    }

    #[test]
    fn test_loosely_typed_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let read = |sql: &str| conn.query_row(sql, [], VocabularyEntry::from_row).unwrap();

        let entry = read("SELECT NULL, 'yesterday', '3', 1.0");
        assert_eq!(entry.word, "");
        assert_eq!(entry.created_at_secs(), 0);
        assert_eq!(entry.lookup_count, 3);
        assert!(entry.is_favorite);

        let entry = read("SELECT 42, '2024-01-02 03:04:05', 2.9, 'x'");
        assert_eq!(entry.word, "42");
        assert_eq!(
            entry.created_at_secs(),
            DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z").unwrap().timestamp()
        );
        assert_eq!(entry.lookup_count, 2);
        assert!(!entry.is_favorite);
    }

    #[test]
    fn test_timestamp_units() {
        let entry = VocabularyEntry {
            word: "apple".to_string(),
            created_at: from_timestamp(1_700_000_000),
            lookup_count: 1,
            is_favorite: false,
        };
        assert_eq!(entry.created_at_secs(), 1_700_000_000);
        assert_eq!(entry.created_at_millis(), 1_700_000_000_000);
    }
}
