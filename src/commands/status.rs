//! Working directory status command handlers

use std::path::Path;
use tauri::command;

use crate::error::Result;
use crate::models::{FileStatus, StatusEntry, WorkingDirectoryStatus};

/// Take one ordered snapshot of the working directory.
///
/// One entry per path; conflicted paths are reported as conflicted even
/// when they also carry staged or unstaged changes.
#[command]
pub async fn get_working_directory_status(path: String) -> Result<WorkingDirectoryStatus> {
    let repo = git2::Repository::open(Path::new(&path))?;

    let mut opts = git2::StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .include_unmodified(false);

    let statuses = repo.statuses(Some(&mut opts))?;
    let mut files = Vec::new();

    for entry in statuses.iter() {
        let Some(entry_path) = entry.path() else {
            continue;
        };
        let status = entry.status();
        let Some(file_status) = map_status(status) else {
            continue;
        };

        files.push(StatusEntry {
            path: entry_path.to_string(),
            status: file_status,
            is_staged: status.intersects(
                git2::Status::INDEX_NEW
                    | git2::Status::INDEX_MODIFIED
                    | git2::Status::INDEX_DELETED
                    | git2::Status::INDEX_RENAMED
                    | git2::Status::INDEX_TYPECHANGE,
            ),
            is_conflicted: status.is_conflicted(),
        });
    }

    Ok(WorkingDirectoryStatus::new(files))
}

fn map_status(status: git2::Status) -> Option<FileStatus> {
    if status.is_conflicted() {
        Some(FileStatus::Conflicted)
    } else if status.is_wt_new() {
        Some(FileStatus::Untracked)
    } else if status.is_index_new() {
        Some(FileStatus::New)
    } else if status.is_wt_modified() || status.is_index_modified() {
        Some(FileStatus::Modified)
    } else if status.is_wt_deleted() || status.is_index_deleted() {
        Some(FileStatus::Deleted)
    } else if status.is_wt_renamed() || status.is_index_renamed() {
        Some(FileStatus::Renamed)
    } else if status.is_wt_typechange() || status.is_index_typechange() {
        Some(FileStatus::Typechange)
    } else {
        None
    }
}
