//! Service layer for Undertow
//!
//! This module contains services that provide higher-level abstractions
//! over the raw git operations.

pub mod dispatcher;
pub mod rebase_service;

pub use dispatcher::GitDispatcher;
