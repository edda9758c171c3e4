//! Tauri command handlers

pub mod editor;
pub mod rebase;
pub mod repository;
pub mod status;
