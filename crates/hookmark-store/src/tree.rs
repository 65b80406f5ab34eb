//! In-memory bookmark tree.
//!
//! Mirrors the browser bookmark API: string IDs assigned from a counter, a
//! single root, folders (no url) and leaf bookmarks, ordered children. Every
//! successful mutation emits a [`RawNotification`] on the attached
//! [`EventBus`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use hookmark_core::defaults::ROOT_ID;
use hookmark_core::{
    BookmarkNode, BookmarkStore, ChangeInfo, CreateInfo, Error, EventBus, MoveInfo,
    RawNotification, RemoveInfo, Result,
};

/// Request for creating a bookmark or folder.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookmarkRequest {
    pub parent_id: String,
    /// Position among the parent's children; appended when absent.
    #[serde(default)]
    pub index: Option<u32>,
    pub title: String,
    /// Omit to create a folder.
    #[serde(default)]
    pub url: Option<String>,
}

/// Request for changing a node's title and/or url.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookmarkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Request for moving a node under a new parent.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveBookmarkRequest {
    pub parent_id: String,
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Clone)]
struct TreeNode {
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    date_added: i64,
    children: Vec<String>,
}

#[derive(Debug)]
struct Tree {
    nodes: HashMap<String, TreeNode>,
    next_id: u64,
}

impl Tree {
    fn new(root_title: &str) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            ROOT_ID.to_string(),
            TreeNode {
                parent_id: None,
                title: root_title.to_string(),
                url: None,
                date_added: Utc::now().timestamp_millis(),
                children: Vec::new(),
            },
        );
        Self { nodes, next_id: 1 }
    }

    fn node(&self, id: &str) -> Result<&TreeNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))
    }

    fn folder(&self, id: &str) -> Result<&TreeNode> {
        let node = self.node(id)?;
        if node.url.is_some() {
            return Err(Error::InvalidInput(format!(
                "Parent {} is a bookmark, not a folder",
                id
            )));
        }
        Ok(node)
    }

    fn index_of(&self, id: &str) -> Option<u32> {
        let parent_id = self.nodes.get(id)?.parent_id.as_deref()?;
        let parent = self.nodes.get(parent_id)?;
        parent
            .children
            .iter()
            .position(|c| c == id)
            .map(|i| i as u32)
    }

    fn snapshot(&self, id: &str) -> Result<BookmarkNode> {
        let node = self.node(id)?;
        Ok(BookmarkNode {
            id: id.to_string(),
            parent_id: node.parent_id.clone(),
            index: self.index_of(id),
            title: node.title.clone(),
            url: node.url.clone(),
            date_added: Some(node.date_added),
        })
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    fn is_within(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id);
        let mut steps = 0;
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.nodes.get(cur).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    fn insert_child(&mut self, parent_id: &str, child: String, index: Option<u32>) -> Result<()> {
        let parent = self
            .nodes
            .get_mut(parent_id)
            .ok_or_else(|| Error::BookmarkNotFound(parent_id.to_string()))?;
        let len = parent.children.len();
        let at = match index {
            None => len,
            Some(i) if (i as usize) <= len => i as usize,
            Some(i) => {
                return Err(Error::InvalidInput(format!(
                    "Index {} out of range for folder {} with {} children",
                    i, parent_id, len
                )))
            }
        };
        parent.children.insert(at, child);
        Ok(())
    }

    fn detach(&mut self, id: &str) -> Option<(String, u32)> {
        let parent_id = self.nodes.get(id)?.parent_id.clone()?;
        let parent = self.nodes.get_mut(&parent_id)?;
        let pos = parent.children.iter().position(|c| c == id)?;
        parent.children.remove(pos);
        Some((parent_id, pos as u32))
    }

    fn remove_subtree(&mut self, id: &str) -> usize {
        let mut stack = vec![id.to_string()];
        let mut removed = 0;
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(&cur) {
                removed += 1;
                stack.extend(node.children);
            }
        }
        removed
    }
}

/// Bookmark tree held in memory.
pub struct MemoryBookmarkStore {
    tree: RwLock<Tree>,
    events: Option<Arc<EventBus>>,
}

impl MemoryBookmarkStore {
    /// Create a tree holding only the root folder.
    pub fn new(root_title: &str) -> Self {
        Self {
            tree: RwLock::new(Tree::new(root_title)),
            events: None,
        }
    }

    /// Create a tree with the two top-level folders browsers start with.
    ///
    /// Their creation is not reported on the event bus.
    pub fn with_default_folders(root_title: &str) -> Self {
        let mut tree = Tree::new(root_title);
        for title in ["Bookmarks Bar", "Other Bookmarks"] {
            let id = tree.next_id.to_string();
            tree.next_id += 1;
            tree.nodes.insert(
                id.clone(),
                TreeNode {
                    parent_id: Some(ROOT_ID.to_string()),
                    title: title.to_string(),
                    url: None,
                    date_added: Utc::now().timestamp_millis(),
                    children: Vec::new(),
                },
            );
            if let Some(root) = tree.nodes.get_mut(ROOT_ID) {
                root.children.push(id);
            }
        }
        Self {
            tree: RwLock::new(tree),
            events: None,
        }
    }

    /// Report mutations on `bus`.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn root_id(&self) -> &'static str {
        ROOT_ID
    }

    fn emit(&self, notification: RawNotification) {
        if let Some(bus) = &self.events {
            bus.emit(notification);
        }
    }

    /// Fetch a node, failing when it does not exist.
    pub async fn fetch(&self, id: &str) -> Result<BookmarkNode> {
        self.tree.read().await.snapshot(id)
    }

    /// Ordered children of a folder.
    pub async fn children(&self, id: &str) -> Result<Vec<BookmarkNode>> {
        let tree = self.tree.read().await;
        let node = tree.node(id)?;
        node.children.iter().map(|c| tree.snapshot(c)).collect()
    }

    /// Number of nodes in the tree, root included.
    pub async fn len(&self) -> usize {
        self.tree.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Create a bookmark (with `url`) or folder (without) under a folder.
    pub async fn create(&self, req: CreateBookmarkRequest) -> Result<BookmarkNode> {
        if let Some(url) = &req.url {
            if url.trim().is_empty() {
                return Err(Error::InvalidInput("Bookmark url cannot be empty".to_string()));
            }
        }

        let node = {
            let mut tree = self.tree.write().await;
            tree.folder(&req.parent_id)?;

            let id = tree.next_id.to_string();
            tree.insert_child(&req.parent_id, id.clone(), req.index)?;
            tree.next_id += 1;
            tree.nodes.insert(
                id.clone(),
                TreeNode {
                    parent_id: Some(req.parent_id.clone()),
                    title: req.title,
                    url: req.url,
                    date_added: Utc::now().timestamp_millis(),
                    children: Vec::new(),
                },
            );
            tree.snapshot(&id)?
        };

        info!(node_id = %node.id, parent_id = %req.parent_id, folder = node.is_folder(), "Bookmark created");
        self.emit(RawNotification::Created {
            id: node.id.clone(),
            info: CreateInfo::from(&node),
        });
        Ok(node)
    }

    /// Change a node's title and/or url. Folders cannot be given a url.
    pub async fn update(&self, id: &str, req: UpdateBookmarkRequest) -> Result<BookmarkNode> {
        if id == ROOT_ID {
            return Err(Error::InvalidInput("The root folder cannot be modified".to_string()));
        }

        let node = {
            let mut tree = self.tree.write().await;
            let entry = tree
                .nodes
                .get_mut(id)
                .ok_or_else(|| Error::BookmarkNotFound(id.to_string()))?;
            if let Some(url) = req.url {
                if entry.url.is_none() {
                    return Err(Error::InvalidInput(format!(
                        "Folder {} cannot have a url",
                        id
                    )));
                }
                if url.trim().is_empty() {
                    return Err(Error::InvalidInput("Bookmark url cannot be empty".to_string()));
                }
                entry.url = Some(url);
            }
            if let Some(title) = req.title {
                entry.title = title;
            }
            tree.snapshot(id)?
        };

        debug!(node_id = %id, "Bookmark updated");
        self.emit(RawNotification::Updated {
            id: node.id.clone(),
            info: ChangeInfo {
                title: node.title.clone(),
                url: node.url.clone(),
            },
        });
        Ok(node)
    }

    /// Remove a node and everything below it.
    ///
    /// One notification is emitted for the removed node; descendants go with
    /// it silently, as with the browser's `removeTree`.
    pub async fn remove(&self, id: &str) -> Result<()> {
        if id == ROOT_ID {
            return Err(Error::InvalidInput("The root folder cannot be removed".to_string()));
        }

        let (parent_id, index, removed) = {
            let mut tree = self.tree.write().await;
            tree.node(id)?;
            let (parent_id, index) = tree
                .detach(id)
                .ok_or_else(|| Error::Internal(format!("Node {} has no parent", id)))?;
            let removed = tree.remove_subtree(id);
            (parent_id, index, removed)
        };

        info!(node_id = %id, parent_id = %parent_id, removed, "Bookmark removed");
        self.emit(RawNotification::Deleted {
            id: id.to_string(),
            info: RemoveInfo {
                parent_id: Some(parent_id),
                index,
            },
        });
        Ok(())
    }

    /// Move a node under `req.parent_id`.
    ///
    /// A folder cannot be moved into itself or any of its descendants.
    pub async fn move_node(&self, id: &str, req: MoveBookmarkRequest) -> Result<BookmarkNode> {
        if id == ROOT_ID {
            return Err(Error::InvalidInput("The root folder cannot be moved".to_string()));
        }

        let (node, old_parent_id, old_index) = {
            let mut tree = self.tree.write().await;
            tree.node(id)?;
            tree.folder(&req.parent_id)?;
            if tree.is_within(&req.parent_id, id) {
                return Err(Error::InvalidInput(format!(
                    "Cannot move {} into its own subtree",
                    id
                )));
            }
            if let Some(i) = req.index {
                let len = tree.node(&req.parent_id)?.children.len();
                let same_parent = tree.node(id)?.parent_id.as_deref() == Some(req.parent_id.as_str());
                let max = if same_parent { len.saturating_sub(1) } else { len };
                if i as usize > max {
                    return Err(Error::InvalidInput(format!(
                        "Index {} out of range for folder {}",
                        i, req.parent_id
                    )));
                }
            }

            let (old_parent_id, old_index) = tree
                .detach(id)
                .ok_or_else(|| Error::Internal(format!("Node {} has no parent", id)))?;
            tree.insert_child(&req.parent_id, id.to_string(), req.index)?;
            if let Some(entry) = tree.nodes.get_mut(id) {
                entry.parent_id = Some(req.parent_id.clone());
            }
            (tree.snapshot(id)?, old_parent_id, old_index)
        };

        info!(
            node_id = %id,
            parent_id = %req.parent_id,
            old_parent_id = %old_parent_id,
            "Bookmark moved"
        );
        self.emit(RawNotification::Moved {
            id: id.to_string(),
            info: MoveInfo {
                parent_id: req.parent_id,
                index: node.index.unwrap_or_default(),
                old_parent_id,
                old_index,
            },
        });
        Ok(node)
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarkStore {
    async fn get(&self, id: &str) -> Result<Option<BookmarkNode>> {
        match self.tree.read().await.snapshot(id) {
            Ok(node) => Ok(Some(node)),
            Err(Error::BookmarkNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
