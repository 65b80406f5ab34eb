//! Mutation envelope and event bus connecting the bookmark store to the
//! webhook pipeline.
//!
//! The store emits a [`RawNotification`] for every mutation. The bus wraps it
//! in a [`NotificationEnvelope`] carrying a UUIDv7 event ID and timestamp, then
//! broadcasts it to every subscriber (the webhook listener, telemetry, tests).

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::RawNotification;

/// A raw notification plus the metadata used to correlate its pipeline run.
#[derive(Debug, Clone)]
pub struct NotificationEnvelope {
    /// Unique event identifier (UUIDv7 for temporal ordering).
    pub event_id: Uuid,
    /// When the mutation was observed (UTC).
    pub occurred_at: DateTime<Utc>,
    pub notification: RawNotification,
}

impl NotificationEnvelope {
    pub fn new(notification: RawNotification) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            occurred_at: Utc::now(),
            notification,
        }
    }
}

/// Broadcast-based event bus for distributing mutation notifications.
///
/// Uses `tokio::sync::broadcast` with a configurable buffer size. Slow
/// receivers that fall behind get a `Lagged` error and miss notifications;
/// undelivered events are never persisted.
pub struct EventBus {
    tx: broadcast::Sender<NotificationEnvelope>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    ///
    /// Recommended: [`crate::defaults::EVENT_BUS_CAPACITY`] for production,
    /// [`crate::defaults::EVENT_BUS_CAPACITY_TEST`] for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Emit a notification to all subscribers.
    ///
    /// If there are no active subscribers, the notification is dropped.
    pub fn emit(&self, notification: RawNotification) {
        let envelope = NotificationEnvelope::new(notification);
        let subscriber_count = self.tx.receiver_count();
        tracing::debug!(
            event_kind = %envelope.notification.kind(),
            event_id = %envelope.event_id,
            node_id = envelope.notification.node_id(),
            subscriber_count,
            "EventBus emit"
        );
        let _ = self.tx.send(envelope);
    }

    /// Subscribe to receive notifications. Each subscriber gets its own
    /// independent stream.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
