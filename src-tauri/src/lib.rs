//! Wordlog - Tauri Application
//!
//! The window is a thin view over the tracker: every read and write goes
//! through a command, the webview keeps no state of its own.

mod commands;
mod state;

use state::AppState;
use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging
    wordlog_core::init_logging();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let state = AppState::new()?;

            // Store state in Tauri
            app.manage(state);

            WebviewWindowBuilder::new(app, "main", WebviewUrl::App("index.html".into()))
                .title("Wordlog")
                .inner_size(600.0, 400.0)
                .min_inner_size(480.0, 320.0)
                .center()
                .build()?;

            tracing::info!("Wordlog started");

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Diagnostics
            commands::diagnostics::frontend_ready,
            // Vocabulary commands
            commands::vocabulary::lookup_word,
            commands::vocabulary::add_word,
            commands::vocabulary::get_vocabulary,
            commands::vocabulary::search_vocabulary,
            commands::vocabulary::get_all_words,
            commands::vocabulary::remove_word,
            commands::vocabulary::toggle_favorite,
            // Maintenance commands
            commands::maintenance::reset_database,
            commands::maintenance::export_database,
            commands::maintenance::import_database,
            commands::maintenance::reopen_database,
        ])
        .run(tauri::generate_context!())
        .expect("error while running Wordlog");
}
