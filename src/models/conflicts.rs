//! Conflict-related model types

use serde::{Deserialize, Serialize};

/// Represents a file with merge conflicts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictFile {
    /// File path relative to repository root
    pub path: String,
    /// Base (ancestor) version
    pub ancestor: Option<ConflictEntry>,
    /// Our (current branch) version
    pub ours: Option<ConflictEntry>,
    /// Their (incoming) version
    pub theirs: Option<ConflictEntry>,
}

/// Represents one side of a conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    /// Object ID (blob hash)
    pub oid: String,
    /// File path
    pub path: String,
    /// File mode
    pub mode: u32,
}

/// An explicit user decision overriding the automatic merge output for one
/// file. A recorded resolution excludes the file from the conflicted count
/// even while its conflict markers are still present in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManualConflictResolution {
    /// Keep the version from the current branch
    Ours,
    /// Keep the incoming version
    Theirs,
    /// The user resolved the file in the working tree themselves
    Manual,
}
