//! Search, sort and pagination over the vocabulary table
//!
//! A [`SearchQuery`] turns into an ordered list of [`Filter`] clauses. The
//! clauses render to a parameterized WHERE shared by the page read and the
//! count read, so `total` always describes the same set as `entries`.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::entry::VocabularyEntry;
use crate::store::VocabularyStore;
use crate::Result;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    CreatedDesc,
    CreatedAsc,
    AlphaAsc,
    AlphaDesc,
    /// Newest first. Restricting to favorites is `favorites_only`'s job.
    Favorites,
}

impl SortOption {
    /// Unknown names fall back to newest first.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "created_asc" => SortOption::CreatedAsc,
            "alpha_asc" => SortOption::AlphaAsc,
            "alpha_desc" => SortOption::AlphaDesc,
            "favorites" => SortOption::Favorites,
            _ => SortOption::CreatedDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::CreatedDesc => "created_desc",
            SortOption::CreatedAsc => "created_asc",
            SortOption::AlphaAsc => "alpha_asc",
            SortOption::AlphaDesc => "alpha_desc",
            SortOption::Favorites => "favorites",
        }
    }

    // Equal timestamps fall back to insertion order in the same direction.
    fn order_by(&self) -> &'static str {
        match self {
            SortOption::CreatedDesc | SortOption::Favorites => "created_at DESC, id DESC",
            SortOption::CreatedAsc => "created_at ASC, id ASC",
            SortOption::AlphaAsc => "word ASC",
            SortOption::AlphaDesc => "word DESC",
        }
    }
}

/// 1-indexed page window. `page_size` of `None` means every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    page_size: Option<u32>,
}

impl Pagination {
    /// Pages below 1 clamp to the first page; sizes below 1 clamp to 1.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: clamp_u32(page),
            page_size: Some(clamp_u32(page_size)),
        }
    }

    pub fn first(page_size: i64) -> Self {
        Self::new(1, page_size)
    }

    pub fn unbounded() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    fn limit(&self) -> i64 {
        self.page_size.map_or(-1, i64::from)
    }

    fn offset(&self) -> i64 {
        self.page_size.map_or(0, |size| {
            i64::from(self.page - 1).saturating_mul(i64::from(size))
        })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first(i64::from(DEFAULT_PAGE_SIZE))
    }
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

/// A single WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Word contains the text as a substring, wildcards matched literally.
    WordContains(String),
    FavoritesOnly,
}

impl Filter {
    fn clause(&self) -> &'static str {
        match self {
            Filter::WordContains(_) => r"word LIKE ? ESCAPE '\'",
            Filter::FavoritesOnly => "is_favorite = 1",
        }
    }

    fn param(&self) -> Option<Value> {
        match self {
            Filter::WordContains(term) => Some(Value::Text(format!("%{}%", escape_like(term)))),
            Filter::FavoritesOnly => None,
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Rendered WHERE clause and its bound values.
#[derive(Debug, Default)]
struct Predicate {
    sql: String,
    params: Vec<Value>,
}

impl Predicate {
    fn from_filters(filters: &[Filter]) -> Self {
        if filters.is_empty() {
            return Self::default();
        }

        let clauses: Vec<&str> = filters.iter().map(Filter::clause).collect();
        Self {
            sql: format!("WHERE {}", clauses.join(" AND ")),
            params: filters.iter().filter_map(Filter::param).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub sort: SortOption,
    pub favorites_only: bool,
    pub pagination: Pagination,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn favorites_only(mut self, favorites_only: bool) -> Self {
        self.favorites_only = favorites_only;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        let term = self.term.trim();
        if !term.is_empty() {
            filters.push(Filter::WordContains(term.to_string()));
        }
        if self.favorites_only {
            filters.push(Filter::FavoritesOnly);
        }

        filters
    }
}

/// One page of entries plus the size of the whole matching set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyPage {
    pub entries: Vec<VocabularyEntry>,
    pub total: u64,
    pub page: u32,
    pub page_size: Option<u32>,
}

impl VocabularyPage {
    pub fn total_pages(&self) -> u64 {
        match self.page_size {
            Some(size) => self.total.div_ceil(u64::from(size)),
            None => self.total.min(1),
        }
    }

    pub fn words(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.word.as_str()).collect()
    }
}

impl VocabularyStore {
    /// Filtered, ordered page plus the filtered total.
    pub fn search(&self, query: &SearchQuery) -> Result<VocabularyPage> {
        let predicate = Predicate::from_filters(&query.filters());
        let pagination = query.pagination;

        let (entries, total) = self.database().with_connection(|conn| {
            let sql = format!(
                "SELECT {} FROM vocabulary {} ORDER BY {} LIMIT ? OFFSET ?",
                VocabularyEntry::COLUMNS,
                predicate.sql,
                query.sort.order_by(),
            );

            let mut params = predicate.params.clone();
            params.push(Value::Integer(pagination.limit()));
            params.push(Value::Integer(pagination.offset()));

            let mut stmt = conn.prepare(&sql)?;
            let entries = stmt
                .query_map(rusqlite::params_from_iter(params), VocabularyEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM vocabulary {}", predicate.sql),
                rusqlite::params_from_iter(predicate.params.iter()),
                |row| row.get(0),
            )?;

            Ok((entries, total))
        })?;

        tracing::debug!(
            term = %query.term,
            sort = query.sort.as_str(),
            favorites_only = query.favorites_only,
            page = pagination.page(),
            returned = entries.len(),
            total,
            "Searched vocabulary"
        );

        Ok(VocabularyPage {
            entries,
            total: total.max(0) as u64,
            page: pagination.page(),
            page_size: pagination.page_size(),
        })
    }
}
