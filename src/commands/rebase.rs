//! Rebase command handlers
//!
//! Thin IPC wrappers over the rebase engine; see
//! [`crate::services::rebase_service`] for the semantics.

use std::path::Path;
use tauri::command;

use crate::error::Result;
use crate::models::{
    ConflictFile, ContinueRebaseResult, ManualConflictResolution, WorkingDirectoryStatus,
};
use crate::services::rebase_service;

/// Rebase the current branch onto another ref
#[command]
pub async fn rebase(path: String, onto: String) -> Result<ContinueRebaseResult> {
    rebase_service::begin_rebase(Path::new(&path), &onto)
}

/// Continue a rebase paused on conflicts
#[command]
pub async fn continue_rebase(
    path: String,
    working_directory: WorkingDirectoryStatus,
) -> Result<ContinueRebaseResult> {
    rebase_service::continue_rebase(Path::new(&path), &working_directory)
}

/// Abort an in-progress rebase
#[command]
pub async fn abort_rebase(path: String) -> Result<()> {
    rebase_service::abort_rebase(Path::new(&path))
}

/// List the current index conflicts
#[command]
pub async fn get_conflicts(path: String) -> Result<Vec<ConflictFile>> {
    rebase_service::list_conflicts(Path::new(&path))
}

/// Record and apply a manual resolution for one conflicted file
#[command]
pub async fn resolve_conflict(
    path: String,
    file: String,
    resolution: ManualConflictResolution,
) -> Result<()> {
    rebase_service::resolve_conflict(Path::new(&path), &file, resolution)
}
