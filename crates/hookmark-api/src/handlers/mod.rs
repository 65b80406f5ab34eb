//! HTTP handlers.

pub mod bookmarks;
pub mod settings;
pub mod system;
