//! [`MutationEvent`] → [`EnrichedPayload`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::ancestry::{AncestorResolver, Resolution};
use crate::models::{EnrichedPayload, MutationEvent, PayloadType};
use crate::traits::BookmarkStore;

/// Key added to `data` holding the "/"-joined folder path.
pub const FOLDER_PATH_KEY: &str = "folderPath";
/// Key added to `data` holding the immediate parent's title.
pub const PARENT_FOLDER_KEY: &str = "parentFolder";

/// Classify a payload from its raw fields: a non-null `url` means a bookmark.
pub fn payload_type(fields: &serde_json::Map<String, Value>) -> PayloadType {
    match fields.get("url") {
        Some(Value::String(_)) => PayloadType::Data,
        _ => PayloadType::Folder,
    }
}

/// Attaches folder metadata to events before delivery.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadEnricher {
    resolver: AncestorResolver,
}

impl PayloadEnricher {
    pub fn new(resolver: AncestorResolver) -> Self {
        Self { resolver }
    }

    /// Build the outbound payload for `event`.
    ///
    /// Folder metadata is only looked up when the event names a parent.
    /// Resolution trouble is logged and the payload goes out without it;
    /// enrichment never fails the event.
    pub async fn enrich(&self, event: MutationEvent, store: &dyn BookmarkStore) -> EnrichedPayload {
        let payload_type = payload_type(&event.raw_fields);
        let mut data = event.raw_fields;

        if let Some(parent_id) = event.parent_id.as_deref() {
            let resolution = self.resolver.resolve(store, parent_id).await;
            match &resolution {
                Resolution::Complete(_) => {}
                Resolution::Partial { path, error } => warn!(
                    node_id = %event.node_id,
                    parent_id,
                    resolved = path.is_some(),
                    error = %error,
                    "Folder path lookup failed; delivering partial path"
                ),
                Resolution::NotFound => warn!(
                    node_id = %event.node_id,
                    parent_id,
                    "Parent folder not found; delivering without folder path"
                ),
                Resolution::DepthExceeded => warn!(
                    node_id = %event.node_id,
                    parent_id,
                    "Parent chain too deep; delivering without folder path"
                ),
            }

            if let Some(path) = resolution.into_path() {
                data.insert(FOLDER_PATH_KEY.into(), Value::from(path.full_path));
                data.insert(
                    PARENT_FOLDER_KEY.into(),
                    Value::from(path.parent_folder_name),
                );
            }
        } else {
            debug!(
                node_id = %event.node_id,
                event_kind = %event.kind,
                "No parent; skipping folder path"
            );
        }

        EnrichedPayload {
            event: event.kind,
            payload_type,
            data,
        }
    }
}
