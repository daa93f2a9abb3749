//! Copy and move between directories.
//!
//! Sources are looked up among the current directory's direct children only.
//! Destinations are resolved by name anywhere in the tree with
//! [`Namespace::find_recursive`], so the first directory with that name in
//! depth-first order wins.
//!
//! Copy produces an independent deep copy: file text is cloned and
//! directories are cloned recursively under fresh ids. Nothing is shared
//! between the original and the copy.

use crate::error::FsError;
use crate::tree::{Namespace, Node, NodeKind};
use crate::types::NodeId;
use tracing::debug;

impl Namespace {
    /// Directory named `name` anywhere under the root.
    ///
    /// A first match that is a file counts as not found. Directories inside
    /// the recycle bin are not valid destinations.
    pub fn resolve_destination(&self, name: &str) -> Result<NodeId, FsError> {
        let found = self.find_recursive(self.root(), name)?;
        if !self.is_directory(found) {
            return Err(FsError::not_found(name));
        }
        if self.is_within_bin(found) {
            return Err(FsError::InRecycleBin(format!(
                "'{}' cannot receive copied or moved items",
                name
            )));
        }
        Ok(found)
    }

    fn transfer_source(&self, current: NodeId, name: &str) -> Result<NodeId, FsError> {
        if self.is_within_bin(current) {
            return Err(FsError::InRecycleBin(
                "use restore to take items out of the recycle bin".to_string(),
            ));
        }
        let source = self.lookup_by_name(current, name)?;
        if source == self.recycle_bin() {
            return Err(FsError::ProtectedNode(name.to_string()));
        }
        Ok(source)
    }

    /// Deep-copy `name` from `current` into the directory named `destination`.
    pub fn copy(&mut self, current: NodeId, name: &str, destination: &str) -> Result<NodeId, FsError> {
        let source = self.transfer_source(current, name)?;
        let target = self.resolve_destination(destination)?;
        if self.child_named(target, name).is_some() {
            return Err(FsError::collision(name));
        }

        let copy = self.clone_subtree(source);
        self.attach(target, copy);
        debug!(from = %self.path_of(source), to = %self.path_of(copy), "Copied node");
        Ok(copy)
    }

    /// Move `name` from `current` into the directory named `destination`.
    pub fn move_node(
        &mut self,
        current: NodeId,
        name: &str,
        destination: &str,
    ) -> Result<NodeId, FsError> {
        let source = self.transfer_source(current, name)?;
        let target = self.resolve_destination(destination)?;
        if self.is_ancestor_or_self(source, target) {
            return Err(FsError::InvalidDestination(name.to_string()));
        }
        if self.child_named(target, name).is_some() {
            return Err(FsError::collision(name));
        }

        self.detach(current, source);
        self.attach(target, source);
        debug!(to = %self.path_of(source), "Moved node");
        Ok(target)
    }

    /// Clone `source` and everything below it under fresh ids, unattached.
    fn clone_subtree(&mut self, source: NodeId) -> NodeId {
        let Some(node) = self.get(source) else {
            return source;
        };
        let (name, kind, children) = (
            node.name.clone(),
            node.kind.clone(),
            node.children().to_vec(),
        );

        let copy = match kind {
            NodeKind::File(file) => self.alloc(Node::file(name, file.contents)),
            NodeKind::Directory(_) => self.alloc(Node::directory(name)),
        };
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.attach(copy, child_copy);
        }
        copy
    }
}
