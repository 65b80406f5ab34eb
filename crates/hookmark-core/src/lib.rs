//! # hookmark-core
//!
//! Core types, traits, and pipeline stages for hookmark.
//!
//! This crate turns bookmark mutation notifications into webhook payloads:
//! normalization, trigger filtering, ancestor path resolution and
//! enrichment. Delivery lives in `hookmark-webhook`; the bookmark tree and
//! settings storage live in `hookmark-store`.

pub mod ancestry;
pub mod defaults;
pub mod enrich;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod traits;
pub mod triggers;

// Re-export commonly used types at crate root
pub use ancestry::{AncestorResolver, Resolution};
pub use enrich::PayloadEnricher;
pub use error::{Error, Result};
pub use events::{EventBus, NotificationEnvelope};
pub use models::*;
pub use normalize::normalize;
pub use traits::*;
pub use triggers::is_enabled;
