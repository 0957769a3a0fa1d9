//! Vocabulary commands
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager, State};

use crate::state::AppState;
use wordlog_core::{ExternalLookup, LookupOutcome, SortOption, VocabularyEntry, VocabularyPage};

/// Entry as sent to the UI. `created_at` is milliseconds since the epoch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryInfo {
    pub word: String,
    pub created_at: i64,
    pub lookup_count: i64,
    pub is_favorite: bool,
}

impl From<VocabularyEntry> for EntryInfo {
    fn from(entry: VocabularyEntry) -> Self {
        let created_at = entry.created_at_millis();
        Self {
            word: entry.word,
            created_at,
            lookup_count: entry.lookup_count,
            is_favorite: entry.is_favorite,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageInfo {
    pub words: Vec<EntryInfo>,
    pub total: u64,
    pub page: u32,
    pub page_size: Option<u32>,
    pub total_pages: u64,
}

impl From<VocabularyPage> for PageInfo {
    fn from(page: VocabularyPage) -> Self {
        let total_pages = page.total_pages();
        Self {
            words: page.entries.into_iter().map(EntryInfo::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LookupInfo {
    pub word: String,
    pub external: ExternalLookup,
    pub vocabulary: PageInfo,
}

impl From<LookupOutcome> for LookupInfo {
    fn from(outcome: LookupOutcome) -> Self {
        Self {
            word: outcome.word,
            external: outcome.external,
            vocabulary: outcome.vocabulary.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WordAddedInfo {
    pub word: String,
    pub vocabulary: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct WordRemovedInfo {
    pub word: String,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

#[tauri::command]
pub async fn lookup_word(
    app: AppHandle,
    word: String,
    open_external: bool,
    page_size: Option<i64>,
) -> CommandResult<LookupInfo> {
    let tracker = match app.state::<AppState>().tracker() {
        Ok(tracker) => tracker,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match tracker.lookup(&word, open_external, page_size).await {
        Ok(outcome) => CommandResult::ok(outcome.into()),
        Err(e) => {
            tracing::error!(word = %word, error = %e, "Lookup failed");
            CommandResult::err(e.to_string())
        }
    }
}

#[tauri::command]
pub fn add_word(state: State<AppState>, word: String) -> CommandResult<WordAddedInfo> {
    match state.with_tracker(|tracker| tracker.add(&word)) {
        Ok(page) => CommandResult::ok(WordAddedInfo {
            word: word.trim().to_string(),
            vocabulary: page.into(),
        }),
        Err(e) => {
            tracing::error!(word = %word, error = %e, "Failed to add word");
            CommandResult::err(e.to_string())
        }
    }
}

#[tauri::command]
pub fn get_vocabulary(state: State<AppState>, page: i64, page_size: i64) -> CommandResult<PageInfo> {
    match state.with_tracker(|tracker| tracker.list_page(page, page_size)) {
        Ok(page) => CommandResult::ok(page.into()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

#[tauri::command]
pub fn search_vocabulary(
    state: State<AppState>,
    search_term: String,
    page: i64,
    page_size: i64,
    sort_option: Option<String>,
    favorites_only: bool,
) -> CommandResult<PageInfo> {
    let sort = sort_option
        .as_deref()
        .map(SortOption::parse)
        .unwrap_or_default();

    match state.with_tracker(|tracker| {
        tracker.search(&search_term, page, page_size, sort, favorites_only)
    }) {
        Ok(page) => CommandResult::ok(page.into()),
        Err(e) => {
            tracing::error!(error = %e, "Search failed");
            CommandResult::err(e.to_string())
        }
    }
}

#[tauri::command]
pub fn get_all_words(state: State<AppState>) -> CommandResult<Vec<String>> {
    match state.with_tracker(|tracker| tracker.list_all_words()) {
        Ok(words) => CommandResult::ok(words),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

#[tauri::command]
pub fn remove_word(state: State<AppState>, word: String) -> CommandResult<WordRemovedInfo> {
    match state.with_tracker(|tracker| tracker.remove(&word)) {
        Ok(removed) => CommandResult::ok(WordRemovedInfo { word, removed }),
        Err(e) => {
            tracing::error!(word = %word, error = %e, "Failed to remove word");
            CommandResult::err(e.to_string())
        }
    }
}

#[tauri::command]
pub fn toggle_favorite(
    state: State<AppState>,
    word: String,
    page_size: Option<i64>,
) -> CommandResult<PageInfo> {
    match state.with_tracker(|tracker| tracker.toggle_favorite(&word, page_size)) {
        Ok(page) => CommandResult::ok(page.into()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
