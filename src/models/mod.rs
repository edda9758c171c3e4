//! Data models for Undertow

pub mod conflicts;
pub mod rebase;
pub mod repository;
pub mod status;

pub use conflicts::*;
pub use rebase::*;
pub use repository::*;
pub use status::*;
