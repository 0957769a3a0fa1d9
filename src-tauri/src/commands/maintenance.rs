//! Store maintenance commands: reset, backup and restore
use tauri::{AppHandle, Manager, State};
use tauri_plugin_dialog::DialogExt;

use super::vocabulary::CommandResult;
use crate::state::AppState;

#[tauri::command]
pub fn reset_database(state: State<AppState>) -> CommandResult<()> {
    match state.with_tracker(|tracker| tracker.reset()) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to reset database");
            CommandResult::err(e.to_string())
        }
    }
}

/// Copy the store into the export directory and return the backup path.
#[tauri::command]
pub fn export_database(state: State<AppState>) -> CommandResult<String> {
    match state.with_tracker(|tracker| tracker.export_store()) {
        Ok(path) => CommandResult::ok(path.to_string_lossy().to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to export database");
            CommandResult::err(e.to_string())
        }
    }
}

/// Ask for a backup file and replace the store with it.
///
/// Async so the blocking file dialog does not run on the main thread.
#[tauri::command]
pub async fn import_database(app: AppHandle) -> CommandResult<()> {
    let picked = app
        .dialog()
        .file()
        .set_title("Import vocabulary")
        .add_filter("SQLite Database", &["sqlite"])
        .blocking_pick_file();

    let Some(picked) = picked else {
        return CommandResult::err("Import cancelled".to_string());
    };

    let Some(path) = picked.as_path().map(|p| p.to_path_buf()) else {
        return CommandResult::err(format!("Unsupported file location: {picked}"));
    };

    match app
        .state::<AppState>()
        .with_tracker(|tracker| tracker.import_store(&path))
    {
        Ok(()) => CommandResult::ok(()),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to import database");
            CommandResult::err(e.to_string())
        }
    }
}

/// Reopen the store after a failed reset or import left it closed.
#[tauri::command]
pub fn reopen_database(state: State<AppState>) -> CommandResult<()> {
    match state.with_tracker(|tracker| tracker.reopen()) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
