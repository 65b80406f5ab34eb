//! Raw notification → [`MutationEvent`].
//!
//! Field names in `raw_fields` are the wire names consumers see under
//! `data`, so they stay camelCase.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::{MutationEvent, RawNotification};
use crate::traits::BookmarkStore;

/// Convert a store notification into its canonical event.
///
/// Only `moved` consults the store: the move notification carries positions
/// but not the node's title or url, so the node is looked up at its new
/// location. A failed lookup leaves `title` out and records `url` as null.
pub async fn normalize(raw: RawNotification, store: &dyn BookmarkStore) -> MutationEvent {
    let kind = raw.kind();
    let mut fields = Map::new();

    let (node_id, parent_id) = match raw {
        RawNotification::Created { id, info } => {
            fields.insert("id".into(), Value::from(id.as_str()));
            if let Some(parent_id) = &info.parent_id {
                fields.insert("parentId".into(), Value::from(parent_id.as_str()));
            }
            if let Some(index) = info.index {
                fields.insert("index".into(), Value::from(index));
            }
            fields.insert("title".into(), Value::from(info.title));
            if let Some(url) = info.url {
                fields.insert("url".into(), Value::from(url));
            }
            if let Some(date_added) = info.date_added {
                fields.insert("dateAdded".into(), Value::from(date_added));
            }
            (id, info.parent_id)
        }
        RawNotification::Updated { id, info } => {
            fields.insert("id".into(), Value::from(id.as_str()));
            fields.insert("title".into(), Value::from(info.title));
            if let Some(url) = info.url {
                fields.insert("url".into(), Value::from(url));
            }
            (id, None)
        }
        RawNotification::Deleted { id, info } => {
            fields.insert("id".into(), Value::from(id.as_str()));
            if let Some(parent_id) = &info.parent_id {
                fields.insert("parentId".into(), Value::from(parent_id.as_str()));
            }
            fields.insert("index".into(), Value::from(info.index));
            (id, info.parent_id)
        }
        RawNotification::Moved { id, info } => {
            fields.insert("id".into(), Value::from(id.as_str()));
            fields.insert("parentId".into(), Value::from(info.parent_id.as_str()));
            fields.insert("index".into(), Value::from(info.index));
            fields.insert("oldParentId".into(), Value::from(info.old_parent_id));
            fields.insert("oldIndex".into(), Value::from(info.old_index));

            let current = match store.get(&id).await {
                Ok(node) => node,
                Err(e) => {
                    warn!(node_id = %id, error = %e, "Lookup of moved node failed");
                    None
                }
            };
            match current {
                Some(node) => {
                    fields.insert("title".into(), Value::from(node.title));
                    fields.insert("url".into(), node.url.map_or(Value::Null, Value::from));
                }
                None => {
                    fields.insert("url".into(), Value::Null);
                }
            }
            (id, Some(info.parent_id))
        }
    };

    MutationEvent {
        kind,
        node_id,
        raw_fields: fields,
        parent_id,
    }
}
