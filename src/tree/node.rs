//! Filesystem node types

use crate::types::NodeId;

/// File payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileNode {
    pub contents: String,
}

/// Directory payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    /// Owning edges, in insertion (listing) order.
    pub children: Vec<NodeId>,
}

/// Node variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File(FileNode),
    Directory(DirectoryNode),
}

/// Kind tag without payload, for listings and outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the namespace arena.
///
/// `parent` is a lookup-only back reference; ownership runs from a
/// directory's `children` down to the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn file(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::File(FileNode {
                contents: contents.into(),
            }),
        }
    }

    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: NodeKind::Directory(DirectoryNode::default()),
        }
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            NodeKind::File(_) => EntryKind::File,
            NodeKind::Directory(_) => EntryKind::Directory,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory(_))
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Directory(dir) => &dir.children,
            NodeKind::File(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Directory(dir) => Some(&mut dir.children),
            NodeKind::File(_) => None,
        }
    }
}
