//! Per-kind trigger filter.

use crate::models::{EventKind, TriggerMap};

/// Whether events of `kind` should be delivered.
///
/// No trigger map at all means every kind is enabled. Once a map exists,
/// only kinds explicitly mapped to `true` pass.
pub fn is_enabled(kind: EventKind, triggers: Option<&TriggerMap>) -> bool {
    match triggers {
        None => true,
        Some(map) => map.get(&kind).copied().unwrap_or(false),
    }
}
