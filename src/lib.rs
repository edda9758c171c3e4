//! Undertow - Git GUI Client
//!
//! A lightweight, open-source, cross-platform Git GUI client
//! built with Tauri 2.0 and Rust.

pub mod commands;
pub mod dialog;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub mod test_utils;

use std::sync::Arc;

use tauri::{Emitter, Manager};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::services::GitDispatcher;

/// Event the frontend's global error banner listens on
pub const ERROR_EVENT: &str = "undertow://error";

/// Initialize the application
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "undertow=debug,git2=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Undertow");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let (dispatcher, mut errors) = GitDispatcher::new();
            app.manage(Arc::new(dispatcher));

            // Controller-side failures never reach the dialogs; forward
            // them to the frontend's global error banner instead
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                while let Some(error) = errors.recv().await {
                    if let Err(e) = handle.emit(ERROR_EVENT, &error) {
                        tracing::warn!("failed to emit error event: {}", e);
                    }
                }
            });

            tracing::info!("Application setup complete");

            #[cfg(debug_assertions)]
            {
                let window = app.get_webview_window("main").unwrap();
                window.open_devtools();
            }

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::repository::open_repository,
            commands::repository::get_repository_info,
            commands::status::get_working_directory_status,
            commands::rebase::rebase,
            commands::rebase::continue_rebase,
            commands::rebase::abort_rebase,
            commands::rebase::get_conflicts,
            commands::rebase::resolve_conflict,
            commands::editor::resolve_external_editor,
            commands::editor::open_file_in_external_editor,
            commands::editor::open_repository_in_shell,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
