//! Rebase conflicts dialog
//!
//! Shown while a rebase is paused on conflicts. The dialog owns no rebase
//! state of its own: everything it displays is derived from the working
//! directory snapshot and resolution map supplied by its owner, and every
//! user action is forwarded verbatim to the injected dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    ContinueRebaseResult, ManualConflictResolution, Repository, StatusEntry,
    WorkingDirectoryStatus,
};

/// Fixed identifier of the modal
pub const DIALOG_ID: &str = "rebase-conflicts-list";

/// Dialog title
pub const DIALOG_TITLE: &str = "Rebase conflicts found";

/// Tooltip on the continue button while conflicts remain
pub const CONTINUE_BLOCKED_TOOLTIP: &str = "Resolve all conflicts before continuing";

/// Button labels
pub const CONTINUE_LABEL: &str = "Continue rebase";
pub const ABORT_LABEL: &str = "Abort rebase";

/// Outbound capability set the dialog needs from the application.
///
/// Injected rather than looked up from ambient state so the dialog can be
/// driven by a fake in tests.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Best-effort editor resolution; the dialog never inspects the outcome
    /// and rendering must not wait on it.
    async fn resolve_current_editor(&self);

    /// Abort the in-progress rebase. Failures are surfaced through the
    /// dispatcher's own error channel, never through the dialog.
    async fn abort_rebase(&self, repository: &Repository);

    /// Attempt to continue the rebase with the given snapshot.
    async fn continue_rebase(
        &self,
        repository: &Repository,
        working_directory: &WorkingDirectoryStatus,
    ) -> ContinueRebaseResult;
}

/// Entries of the snapshot with an unresolved merge, in snapshot order.
pub fn unmerged_files(snapshot: &WorkingDirectoryStatus) -> Vec<StatusEntry> {
    snapshot
        .files
        .iter()
        .filter(|entry| entry.is_conflicted)
        .cloned()
        .collect()
}

/// Unmerged entries whose path has no recorded manual resolution.
///
/// Any recorded resolution counts as fully resolved; presence in the map
/// is what excludes a file from the count.
pub fn conflicted_files_count(
    snapshot: &WorkingDirectoryStatus,
    resolutions: &HashMap<String, ManualConflictResolution>,
) -> usize {
    snapshot
        .files
        .iter()
        .filter(|entry| entry.is_conflicted && !resolutions.contains_key(&entry.path))
        .count()
}

pub type DismissCallback = Box<dyn Fn() + Send + Sync>;
pub type OpenFileCallback = Box<dyn Fn(&str) + Send + Sync>;
pub type OpenShellCallback = Box<dyn Fn(&Repository) + Send + Sync>;

/// Pure projection of the dialog for the renderer. Recomputed from the
/// current props on every render, never cached.
#[derive(Debug, Clone)]
pub struct RebaseConflictsView {
    pub id: &'static str,
    pub title: &'static str,
    /// Unmerged files, in snapshot order
    pub files: Vec<StatusEntry>,
    pub conflicted_files_count: usize,
    pub continue_label: &'static str,
    pub continue_enabled: bool,
    pub continue_tooltip: Option<&'static str>,
    pub abort_label: &'static str,
    /// Name of the resolved external editor, when one is known
    pub resolved_external_editor: Option<String>,
}

/// View model for the rebase conflicts modal.
///
/// Created when a rebase pauses on conflicts, destroyed on dismissal.
/// Dismissal is latched: whichever path closes the dialog first (close,
/// successful continue, settled abort) fires `on_dismissed` exactly once,
/// and operations settling afterwards are ignored.
pub struct RebaseConflictsDialog {
    dispatcher: Arc<dyn Dispatcher>,
    repository: Repository,
    working_directory: WorkingDirectoryStatus,
    manual_resolutions: HashMap<String, ManualConflictResolution>,
    resolved_external_editor: Option<String>,
    on_dismissed: DismissCallback,
    open_file_in_external_editor: OpenFileCallback,
    open_repository_in_shell: OpenShellCallback,
    mounted: bool,
    dismissed: bool,
}

impl RebaseConflictsDialog {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        dispatcher: Arc<dyn Dispatcher>,
        repository: Repository,
        working_directory: WorkingDirectoryStatus,
        manual_resolutions: HashMap<String, ManualConflictResolution>,
        resolved_external_editor: Option<String>,
        on_dismissed: DismissCallback,
        open_file_in_external_editor: OpenFileCallback,
        open_repository_in_shell: OpenShellCallback,
    ) -> Self {
        Self {
            dispatcher,
            repository,
            working_directory,
            manual_resolutions,
            resolved_external_editor,
            on_dismissed,
            open_file_in_external_editor,
            open_repository_in_shell,
            mounted: false,
            dismissed: false,
        }
    }

    /// Called once when the dialog becomes visible. Kicks off editor
    /// resolution; subsequent calls (e.g. after prop updates) are no-ops.
    pub async fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.dispatcher.resolve_current_editor().await;
    }

    /// Replace the inputs; the next render derives from the new values.
    pub fn update_props(
        &mut self,
        working_directory: WorkingDirectoryStatus,
        manual_resolutions: HashMap<String, ManualConflictResolution>,
    ) {
        self.working_directory = working_directory;
        self.manual_resolutions = manual_resolutions;
    }

    pub fn set_resolved_editor(&mut self, editor: Option<String>) {
        self.resolved_external_editor = editor;
    }

    pub fn is_open(&self) -> bool {
        !self.dismissed
    }

    pub fn render(&self) -> RebaseConflictsView {
        let files = unmerged_files(&self.working_directory);
        let count = conflicted_files_count(&self.working_directory, &self.manual_resolutions);

        RebaseConflictsView {
            id: DIALOG_ID,
            title: DIALOG_TITLE,
            files,
            conflicted_files_count: count,
            continue_label: CONTINUE_LABEL,
            continue_enabled: count == 0,
            continue_tooltip: (count > 0).then_some(CONTINUE_BLOCKED_TOOLTIP),
            abort_label: ABORT_LABEL,
            resolved_external_editor: self.resolved_external_editor.clone(),
        }
    }

    /// Continue the rebase. Dismisses the dialog only when the attempt
    /// completed without error; any other outcome leaves it open so the
    /// user can correct the state.
    pub async fn submit(&mut self) -> ContinueRebaseResult {
        let result = self
            .dispatcher
            .continue_rebase(&self.repository, &self.working_directory)
            .await;

        if result == ContinueRebaseResult::CompletedWithoutError {
            self.dismiss();
        }
        result
    }

    /// Abort the rebase and dismiss once the call settles, whatever its
    /// outcome. Failures are the dispatcher's to report.
    pub async fn cancel(&mut self) {
        self.dispatcher.abort_rebase(&self.repository).await;
        self.dismiss();
    }

    /// User dismissal (close button, escape).
    pub fn close(&mut self) {
        self.dismiss();
    }

    /// Delegate a per-file editor launch to the owner.
    pub fn open_file(&self, path: &str) {
        (self.open_file_in_external_editor)(path);
    }

    /// Delegate a shell launch to the owner.
    pub fn open_shell(&self) {
        (self.open_repository_in_shell)(&self.repository);
    }

    fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        (self.on_dismissed)();
    }
}
