//! Ancestor folder path resolution.
//!
//! Walks parent links from a starting folder up to the root with an explicit
//! bounded loop. Lookups are sequential; each one may suspend on the store.

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::defaults::{FOLDER_PATH_SEPARATOR, MAX_ANCESTOR_DEPTH};
use crate::models::AncestorPath;
use crate::traits::BookmarkStore;

/// How a resolution walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Walked until the root (or a missing node) was reached.
    Complete(AncestorPath),
    /// A lookup errored; holds whatever was accumulated before it.
    Partial {
        path: Option<AncestorPath>,
        error: String,
    },
    /// The starting folder itself does not exist.
    NotFound,
    /// More than the allowed number of links were followed.
    DepthExceeded,
}

impl Resolution {
    /// The path to attach to a payload, if any folder was resolved.
    pub fn path(&self) -> Option<&AncestorPath> {
        match self {
            Resolution::Complete(path) => Some(path),
            Resolution::Partial { path, .. } => path.as_ref(),
            Resolution::NotFound | Resolution::DepthExceeded => None,
        }
    }

    pub fn into_path(self) -> Option<AncestorPath> {
        match self {
            Resolution::Complete(path) => Some(path),
            Resolution::Partial { path, .. } => path,
            Resolution::NotFound | Resolution::DepthExceeded => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Resolution::Complete(_))
    }
}

/// Resolves folder paths against a [`BookmarkStore`].
#[derive(Debug, Clone, Copy)]
pub struct AncestorResolver {
    max_depth: usize,
}

impl Default for AncestorResolver {
    fn default() -> Self {
        Self {
            max_depth: MAX_ANCESTOR_DEPTH,
        }
    }
}

impl AncestorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of nodes visited before giving up.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve the path from the root down to `parent_id` inclusive.
    ///
    /// The first title seen (the starting folder's) becomes the parent folder
    /// name. Each subsequent title is prepended to the path.
    pub async fn resolve(&self, store: &dyn BookmarkStore, parent_id: &str) -> Resolution {
        let mut titles: VecDeque<String> = VecDeque::new();
        let mut current = Some(parent_id.to_string());

        while let Some(id) = current.take() {
            if titles.len() >= self.max_depth {
                warn!(
                    parent_id,
                    depth = titles.len(),
                    max_depth = self.max_depth,
                    "Ancestor chain exceeded depth cap"
                );
                return Resolution::DepthExceeded;
            }

            match store.get(&id).await {
                Ok(Some(node)) => {
                    trace!(node_id = %node.id, title = %node.title, depth = titles.len(), "Ancestor");
                    titles.push_front(node.title);
                    current = node.parent_id;
                }
                Ok(None) => break,
                Err(e) => {
                    return Resolution::Partial {
                        path: build_path(titles),
                        error: e.to_string(),
                    };
                }
            }
        }

        match build_path(titles) {
            Some(path) => Resolution::Complete(path),
            None => Resolution::NotFound,
        }
    }
}

fn build_path(titles: VecDeque<String>) -> Option<AncestorPath> {
    // The starting folder was pushed first, so it sits at the back.
    let parent_folder_name = titles.back()?.clone();
    let full_path = Vec::from(titles).join(FOLDER_PATH_SEPARATOR);
    Some(AncestorPath {
        full_path,
        parent_folder_name,
    })
}
