//! Dispatcher wiring the dialog view models to the git engine
//!
//! Failures inside abort/continue never reach the dialogs; they are
//! logged and pushed onto an error channel the application forwards to
//! the frontend's global error banner.

use std::path::Path;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::commands::editor;
use crate::dialog::Dispatcher;
use crate::error::{ErrorResponse, UndertowError};
use crate::models::{ContinueRebaseResult, Repository, WorkingDirectoryStatus};
use crate::services::rebase_service;

/// Production [`Dispatcher`] backed by the rebase engine
pub struct GitDispatcher {
    errors: mpsc::UnboundedSender<ErrorResponse>,
}

impl GitDispatcher {
    /// Create a dispatcher and the receiving end of its error channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ErrorResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { errors: tx }, rx)
    }

    fn report(&self, error: &UndertowError) {
        tracing::error!("{}", error);
        // The receiver outlives dialogs; a closed channel just drops the report
        let _ = self.errors.send(ErrorResponse::from(error));
    }
}

#[async_trait]
impl Dispatcher for GitDispatcher {
    async fn resolve_current_editor(&self) {
        // Warms the probe cache so per-file launches are instant; the
        // dialog neither awaits nor inspects the answer.
        if editor::probe_external_editor().is_none() {
            tracing::debug!("no external editor found on this system");
        }
    }

    async fn abort_rebase(&self, repository: &Repository) {
        if let Err(e) = rebase_service::abort_rebase(Path::new(&repository.path)) {
            self.report(&e);
        }
    }

    async fn continue_rebase(
        &self,
        repository: &Repository,
        working_directory: &WorkingDirectoryStatus,
    ) -> ContinueRebaseResult {
        match rebase_service::continue_rebase(Path::new(&repository.path), working_directory) {
            Ok(result) => result,
            Err(e) => {
                self.report(&e);
                ContinueRebaseResult::Error
            }
        }
    }
}
