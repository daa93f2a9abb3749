//! Tree: node model and the namespace built from it.

pub mod namespace;
pub mod node;
pub mod outline;
pub mod similarity;

pub use namespace::{ListEntry, Namespace, NodeCounts, RECYCLE_BIN_NAME, ROOT_NAME};
pub use node::{DirectoryNode, EntryKind, FileNode, Node, NodeKind};
pub use outline::{OutlineEntry, TreeOutline};
