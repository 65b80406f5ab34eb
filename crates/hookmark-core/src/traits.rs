//! Collaborator traits for hookmark.
//!
//! These traits define the interfaces the pipeline needs from its host:
//! a bookmark store to look nodes up in, a source of user settings, and
//! somewhere to surface alerts. Concrete implementations live in
//! `hookmark-store` and `hookmark-webhook`; tests supply their own.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BookmarkNode, WebhookConfig};

/// Read access to the bookmark tree.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Look a node up by ID.
    ///
    /// `Ok(None)` means the node does not exist (the root's parent, or a
    /// node removed in the meantime). `Err` means the store could not answer.
    async fn get(&self, id: &str) -> Result<Option<BookmarkNode>>;
}

/// Source of the current webhook settings.
pub trait ConfigProvider: Send + Sync {
    /// Snapshot of the settings at the time of the call.
    fn get(&self) -> WebhookConfig;
}

/// Surface for user-visible alerts. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn show(&self, title: &str, message: &str);
}
