//! Working directory status models

use serde::{Deserialize, Serialize};

/// Immutable snapshot of the working directory at a point in time.
///
/// Entries keep the order git reported them in; consumers that derive
/// views from the snapshot are expected to preserve that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingDirectoryStatus {
    pub files: Vec<StatusEntry>,
}

impl WorkingDirectoryStatus {
    pub fn new(files: Vec<StatusEntry>) -> Self {
        Self { files }
    }
}

/// Status entry for a file in the working directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
    pub is_staged: bool,
    pub is_conflicted: bool,
}

/// File status in the working directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    New,
    Modified,
    Deleted,
    Renamed,
    Untracked,
    Typechange,
    Conflicted,
}
