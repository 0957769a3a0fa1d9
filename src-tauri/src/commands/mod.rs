//! Tauri IPC Commands
//!
//! These commands bridge the frontend to the tracker. Every reply is a
//! `CommandResult`; errors carry only a message.

pub mod diagnostics;
pub mod maintenance;
pub mod vocabulary;
