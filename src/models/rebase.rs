//! Rebase models

use serde::{Deserialize, Serialize};

/// Discriminated outcome of starting or continuing a rebase.
///
/// Only `CompletedWithoutError` means the rebase finished; every other
/// variant leaves the rebase (and any dialog driving it) where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContinueRebaseResult {
    /// The rebase ran to completion
    CompletedWithoutError,
    /// A step produced conflicts; the rebase is paused on disk
    ConflictsEncountered,
    /// Conflicts are resolved but changes could not be staged
    OutstandingFilesNotStaged,
    /// The rebase was aborted out from under the attempt. Never produced
    /// by the engine (aborts go through their own call); carried so the
    /// IPC type covers every outcome a frontend can observe.
    Aborted,
    /// An operational git failure, reported through the dispatcher
    Error,
}
