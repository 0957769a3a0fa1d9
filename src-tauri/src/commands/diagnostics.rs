use tauri::State;

use super::vocabulary::CommandResult;
use crate::state::AppState;

#[tauri::command]
pub fn frontend_ready(state: State<AppState>) -> CommandResult<u32> {
    tracing::info!("Frontend ready");
    match state.with_tracker(|tracker| Ok(tracker.config().page_size)) {
        Ok(page_size) => CommandResult::ok(page_size),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
