//! Domain models shared by every hookmark crate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

// =============================================================================
// BOOKMARK TREE
// =============================================================================

/// A node in the bookmark tree, as reported by the store.
///
/// Folders have no `url`; every other node is a leaf bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    /// Absent only for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Position among the parent's children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Creation time in Unix epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

// =============================================================================
// MUTATION KINDS
// =============================================================================

/// The four kinds of bookmark mutation the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
    Moved,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Created,
        EventKind::Updated,
        EventKind::Deleted,
        EventKind::Moved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
            EventKind::Moved => "moved",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            "moved" => Ok(Self::Moved),
            _ => Err(Error::InvalidInput(format!("unknown event kind: {}", s))),
        }
    }
}

// =============================================================================
// RAW NOTIFICATIONS
// =============================================================================

/// Fields delivered with a `created` notification (the full new node).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInfo {
    pub parent_id: Option<String>,
    pub index: Option<u32>,
    pub title: String,
    pub url: Option<String>,
    pub date_added: Option<i64>,
}

impl From<&BookmarkNode> for CreateInfo {
    fn from(node: &BookmarkNode) -> Self {
        Self {
            parent_id: node.parent_id.clone(),
            index: node.index,
            title: node.title.clone(),
            url: node.url.clone(),
            date_added: node.date_added,
        }
    }
}

/// Fields delivered with an `updated` notification.
///
/// `url` is only reported for leaf bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInfo {
    pub title: String,
    pub url: Option<String>,
}

/// Fields delivered with a `deleted` notification. The node is gone, so no
/// title or url is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveInfo {
    pub parent_id: Option<String>,
    pub index: u32,
}

/// Fields delivered with a `moved` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveInfo {
    pub parent_id: String,
    pub index: u32,
    pub old_parent_id: String,
    pub old_index: u32,
}

/// A mutation signal emitted by the bookmark store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNotification {
    Created { id: String, info: CreateInfo },
    Updated { id: String, info: ChangeInfo },
    Deleted { id: String, info: RemoveInfo },
    Moved { id: String, info: MoveInfo },
}

impl RawNotification {
    pub fn kind(&self) -> EventKind {
        match self {
            RawNotification::Created { .. } => EventKind::Created,
            RawNotification::Updated { .. } => EventKind::Updated,
            RawNotification::Deleted { .. } => EventKind::Deleted,
            RawNotification::Moved { .. } => EventKind::Moved,
        }
    }

    pub fn node_id(&self) -> &str {
        match self {
            RawNotification::Created { id, .. }
            | RawNotification::Updated { id, .. }
            | RawNotification::Deleted { id, .. }
            | RawNotification::Moved { id, .. } => id,
        }
    }
}

// =============================================================================
// PIPELINE VALUES
// =============================================================================

/// Canonical form of one mutation, valid for a single pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationEvent {
    pub kind: EventKind,
    pub node_id: String,
    /// Whatever fields the notification carried, keyed by wire name.
    pub raw_fields: Map<String, Value>,
    pub parent_id: Option<String>,
}

/// Payload classification on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadType {
    /// A leaf bookmark (the node has a url).
    Data,
    Folder,
}

/// The JSON body POSTed to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPayload {
    pub event: EventKind,
    #[serde(rename = "type")]
    pub payload_type: PayloadType,
    pub data: Map<String, Value>,
}

/// Resolved ancestor folders of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorPath {
    /// Folder titles from the root to the immediate parent, "/"-joined.
    pub full_path: String,
    /// Title of the immediate parent.
    pub parent_folder_name: String,
}

// =============================================================================
// CONFIG
// =============================================================================

/// Per-kind enablement flags.
pub type TriggerMap = BTreeMap<EventKind, bool>;

/// User preferences read by the pipeline on every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// `None` enables every kind; `Some` enables only kinds mapped to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<TriggerMap>,
}

impl WebhookConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: Some(webhook_url.into()),
            triggers: None,
        }
    }

    pub fn with_trigger(mut self, kind: EventKind, enabled: bool) -> Self {
        self.triggers
            .get_or_insert_with(TriggerMap::new)
            .insert(kind, enabled);
        self
    }

    /// The configured URL, if it is set and not blank.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Why an event was intentionally not delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TriggerDisabled(EventKind),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TriggerDisabled(kind) => write!(f, "trigger for {} is disabled", kind),
        }
    }
}

/// Why an event could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No webhook URL configured.
    ConfigMissing,
    /// The endpoint answered with a non-2xx status.
    HttpStatus(u16),
    /// The request never produced a response.
    Transport(String),
    Serialization(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ConfigMissing => f.write_str("webhook URL not set"),
            FailureReason::HttpStatus(code) => write!(f, "HTTP error! status: {}", code),
            FailureReason::Transport(msg) => write!(f, "transport error: {}", msg),
            FailureReason::Serialization(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

/// Result of one pipeline pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Skipped(SkipReason),
    Failed(FailureReason),
}

impl DeliveryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered => "delivered",
            DeliveryOutcome::Skipped(_) => "skipped",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}
