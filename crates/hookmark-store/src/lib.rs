//! # hookmark-store
//!
//! Storage collaborators for the hookmark pipeline: an in-memory bookmark
//! tree that reports its mutations, and the webhook settings store.

pub mod settings;
pub mod tree;

pub use settings::{
    parse_settings, render_settings, resolve_env, validate, ConfigError, ConfigResult,
    SettingsStore,
};
pub use tree::{
    CreateBookmarkRequest, MemoryBookmarkStore, MoveBookmarkRequest, UpdateBookmarkRequest,
};
