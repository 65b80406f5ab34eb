//! # hookmark-webhook
//!
//! Delivers bookmark mutations to the configured webhook: the pipeline that
//! runs each notification, the HTTP dispatcher, the failure notifier, and
//! the event bus listener that ties them to a bookmark store.

pub mod dispatcher;
pub mod listener;
pub mod notifier;
pub mod pipeline;

pub use dispatcher::WebhookDispatcher;
pub use listener::{run_listener, spawn_listener};
pub use notifier::{FailureNotifier, Notification, NotificationLog};
pub use pipeline::Pipeline;
