//! Dialog view models driven by the frontend shell
//!
//! Each dialog is a plain struct: props in, a render projection out,
//! with outbound effects routed through an injected [`Dispatcher`].

pub mod rebase_conflicts;

pub use rebase_conflicts::{Dispatcher, RebaseConflictsDialog, RebaseConflictsView};
