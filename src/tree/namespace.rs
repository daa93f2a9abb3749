//! Namespace: the arena-backed directory tree.
//!
//! Nodes live in a single map keyed by [`NodeId`]. A directory owns its
//! children through an ordered id list; each node points back at its parent
//! by id only, so there is no ownership cycle.

use crate::error::{FsError, Rejection};
use crate::recycle::DeletionIndex;
use crate::tree::node::{EntryKind, Node, NodeKind};
use crate::tree::similarity::{closest_match, SUGGESTION_CUTOFF};
use crate::types::NodeId;
use std::collections::HashMap;
use tracing::debug;

/// Name of the session root.
pub const ROOT_NAME: &str = "root";

/// Name of the recycle bin directory under the root.
pub const RECYCLE_BIN_NAME: &str = "recycle_bin";

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Recursive file and directory totals. The directory count includes the
/// directory the count started from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCounts {
    pub files: usize,
    pub directories: usize,
}

/// The session's tree plus the recycle bin bookkeeping that lives next to it.
#[derive(Debug)]
pub struct Namespace {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    recycle_bin: NodeId,
    next_id: u64,
    pub(crate) deletions: DeletionIndex,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Fresh tree: a root holding only an empty recycle bin.
    pub fn new() -> Self {
        let mut namespace = Self {
            nodes: HashMap::new(),
            root: NodeId(0),
            recycle_bin: NodeId(0),
            next_id: 0,
            deletions: DeletionIndex::default(),
        };
        namespace.root = namespace.alloc(Node::directory(ROOT_NAME));
        let bin = namespace.alloc(Node::directory(RECYCLE_BIN_NAME));
        namespace.attach(namespace.root, bin);
        namespace.recycle_bin = bin;
        namespace
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn recycle_bin(&self) -> NodeId {
        self.recycle_bin
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, FsError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| FsError::not_found(id.to_string()))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, FsError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| FsError::not_found(id.to_string()))
    }

    /// Name of a node, or an empty string for a stale id.
    pub fn name(&self, id: NodeId) -> &str {
        self.nodes.get(&id).map(|n| n.name.as_str()).unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or(&[])
    }

    pub fn is_directory(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(Node::is_directory)
    }

    /// Total number of live nodes, root and bin included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// True for the recycle bin itself and anything beneath it.
    pub fn is_within_bin(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.recycle_bin, id)
    }

    /// Slash-joined path from the root, e.g. `root/docs/a`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            segments.push(node.name.as_str());
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Append `child` to `parent`'s children and point it back at `parent`.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes.get_mut(&parent).and_then(Node::children_mut) {
            children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// Drop the `parent -> child` edge. Returns false if it was already gone.
    pub(crate) fn detach(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(children) = self.nodes.get_mut(&parent).and_then(Node::children_mut) else {
            return false;
        };
        let before = children.len();
        children.retain(|c| *c != child);
        before != children.len()
    }

    /// Remove a node and everything below it from the arena.
    ///
    /// The caller is responsible for detaching it from its parent first.
    pub(crate) fn drop_subtree(&mut self, id: NodeId) -> usize {
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children().iter().copied());
                removed += 1;
            }
        }
        removed
    }

    pub(crate) fn directory(&self, id: NodeId) -> Result<&Node, FsError> {
        let node = self.node(id)?;
        if !node.is_directory() {
            return Err(FsError::NotADirectory(node.name.clone()));
        }
        Ok(node)
    }

    /// Exact, case-sensitive, single-level lookup.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.name(*c) == name)
    }

    pub fn lookup_by_name(&self, parent: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.child_named(parent, name)
            .ok_or_else(|| FsError::not_found(name))
    }

    /// Depth-first search below `start` for the first node named `name`.
    ///
    /// Children are visited in insertion order and each child's own name is
    /// tested before descending into it. Kind does not matter. This walks
    /// the whole subtree, O(tree size) per call.
    pub fn find_recursive(&self, start: NodeId, name: &str) -> Result<NodeId, FsError> {
        let mut stack: Vec<NodeId> = self.children(start).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            if node.name == name {
                return Ok(current);
            }
            stack.extend(node.children().iter().rev().copied());
        }
        Err(FsError::not_found(name))
    }

    fn ensure_name_free(&self, parent: NodeId, name: &str) -> Result<(), FsError> {
        if self.child_named(parent, name).is_some() {
            return Err(FsError::collision(name));
        }
        Ok(())
    }

    fn ensure_authoring_allowed(&self, parent: NodeId) -> Result<(), FsError> {
        if self.is_within_bin(parent) {
            return Err(FsError::InRecycleBin(
                "new files and directories cannot be created here".to_string(),
            ));
        }
        Ok(())
    }

    /// Append a new empty directory to `parent`.
    pub fn create_directory(&mut self, parent: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.directory(parent)?;
        self.ensure_authoring_allowed(parent)?;
        if name.is_empty() {
            return Err(FsError::EmptyName);
        }
        self.ensure_name_free(parent, name)?;

        let id = self.alloc(Node::directory(name));
        self.attach(parent, id);
        debug!(path = %self.path_of(id), "Created directory");
        Ok(id)
    }

    /// Existing file named `name` directly under `parent`, if any.
    pub fn open_file(&self, parent: NodeId, name: &str) -> Result<Option<NodeId>, FsError> {
        self.directory(parent)?;
        if name.is_empty() {
            return Err(FsError::EmptyName);
        }
        match self.child_named(parent, name) {
            Some(id) if self.is_directory(id) => Err(FsError::IsADirectory(name.to_string())),
            found => Ok(found),
        }
    }

    /// Append a new file with `contents` to `parent`.
    pub fn create_file(
        &mut self,
        parent: NodeId,
        name: &str,
        contents: impl Into<String>,
    ) -> Result<NodeId, FsError> {
        self.directory(parent)?;
        self.ensure_authoring_allowed(parent)?;
        if name.is_empty() {
            return Err(FsError::EmptyName);
        }
        self.ensure_name_free(parent, name)?;

        let id = self.alloc(Node::file(name, contents));
        self.attach(parent, id);
        debug!(path = %self.path_of(id), "Created file");
        Ok(id)
    }

    /// Open `name` under `parent`, or create it with text from `contents`.
    ///
    /// `contents` is only invoked for a new file. Returns `(file, is_new)`.
    pub fn create_or_open_file<F>(
        &mut self,
        parent: NodeId,
        name: &str,
        contents: F,
    ) -> Result<(NodeId, bool), FsError>
    where
        F: FnOnce() -> String,
    {
        if let Some(existing) = self.open_file(parent, name)? {
            return Ok((existing, false));
        }
        let id = self.create_file(parent, name, contents())?;
        Ok((id, true))
    }

    pub fn contents(&self, file: NodeId) -> Result<&str, FsError> {
        let node = self.node(file)?;
        match &node.kind {
            NodeKind::File(f) => Ok(&f.contents),
            NodeKind::Directory(_) => Err(FsError::IsADirectory(node.name.clone())),
        }
    }

    /// Replace a file's text wholesale.
    pub fn write_file(&mut self, file: NodeId, contents: impl Into<String>) -> Result<(), FsError> {
        let node = self.node_mut(file)?;
        match &mut node.kind {
            NodeKind::File(f) => {
                f.contents = contents.into();
                Ok(())
            }
            NodeKind::Directory(_) => Err(FsError::IsADirectory(node.name.clone())),
        }
    }

    /// Rename a direct child of `parent`.
    ///
    /// A sibling already holding `new_name` wins over a missing `old_name`.
    /// When `old_name` is missing the rejection carries the closest sibling
    /// name as a hint.
    pub fn rename(&mut self, parent: NodeId, old_name: &str, new_name: &str) -> Result<(), Rejection> {
        self.directory(parent)?;
        if new_name.is_empty() {
            return Err(FsError::EmptyName.into());
        }
        self.ensure_name_free(parent, new_name)?;

        let Some(id) = self.child_named(parent, old_name) else {
            let hint = closest_match(
                old_name,
                self.children(parent).iter().map(|c| self.name(*c)),
                SUGGESTION_CUTOFF,
            )
            .map(str::to_string);
            return Err(Rejection::with_hint(FsError::not_found(old_name), hint));
        };
        if id == self.recycle_bin {
            return Err(FsError::ProtectedNode(old_name.to_string()).into());
        }

        self.node_mut(id)?.name = new_name.to_string();
        debug!(from = old_name, to = new_name, "Renamed node");
        Ok(())
    }

    /// Children of `directory` in insertion order.
    pub fn list(&self, directory: NodeId) -> Result<Vec<ListEntry>, FsError> {
        let dir = self.directory(directory)?;
        Ok(dir
            .children()
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .map(|n| ListEntry {
                name: n.name.clone(),
                kind: n.entry_kind(),
            })
            .collect())
    }

    pub fn count_nodes(&self, directory: NodeId) -> Result<NodeCounts, FsError> {
        self.directory(directory)?;
        let mut counts = NodeCounts::default();
        let mut stack = vec![directory];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            if node.is_directory() {
                counts.directories += 1;
                stack.extend(node.children().iter().copied());
            } else {
                counts.files += 1;
            }
        }
        Ok(counts)
    }

    pub fn navigate_up(&self, current: NodeId) -> Result<NodeId, FsError> {
        self.parent(current).ok_or(FsError::AtRoot)
    }

    /// Step into the child directory `name`.
    ///
    /// The bin itself can be entered, but directories sitting in the bin
    /// cannot: their contents are frozen until restored or purged.
    pub fn navigate_into(&self, current: NodeId, name: &str) -> Result<NodeId, FsError> {
        let id = self.lookup_by_name(current, name)?;
        if !self.is_directory(id) {
            return Err(FsError::NotADirectory(name.to_string()));
        }
        if id != self.recycle_bin && self.is_within_bin(id) {
            return Err(FsError::InRecycleBin(format!(
                "restore '{}' before opening it",
                name
            )));
        }
        Ok(id)
    }
}
