//! Tree outline snapshots for the `tree` command.

use crate::error::FsError;
use crate::tree::namespace::{Namespace, NodeCounts};
use crate::tree::node::EntryKind;
use crate::types::NodeId;
use std::fmt;

/// One row of an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub name: String,
    pub kind: EntryKind,
    pub is_last: bool,
}

/// Point-in-time outline of a subtree.
///
/// The outline owns its rows, so later changes to the namespace do not
/// affect it and it can be formatted any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOutline {
    entries: Vec<OutlineEntry>,
    counts: NodeCounts,
}

impl TreeOutline {
    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn counts(&self) -> NodeCounts {
        self.counts
    }

    /// Formatted rows, produced on demand. Each call starts from the top.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|entry| {
            let connector = if entry.is_last { "└── " } else { "├── " };
            format!("{}{}{}", "  ".repeat(entry.depth), connector, entry.name)
        })
    }
}

impl fmt::Display for TreeOutline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        write!(
            f,
            "{} directories, {} files",
            self.counts.directories, self.counts.files
        )
    }
}

impl Namespace {
    /// Snapshot the subtree rooted at `start` as a nested outline.
    pub fn outline(&self, start: NodeId) -> Result<TreeOutline, FsError> {
        let root = self.directory(start)?;
        let mut entries = vec![OutlineEntry {
            depth: 0,
            name: root.name.clone(),
            kind: EntryKind::Directory,
            is_last: true,
        }];

        // (node, depth, is_last), popped in display order
        let mut stack: Vec<(NodeId, usize, bool)> = Vec::new();
        push_children(self, start, 1, &mut stack);
        while let Some((id, depth, is_last)) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            entries.push(OutlineEntry {
                depth,
                name: node.name.clone(),
                kind: node.entry_kind(),
                is_last,
            });
            push_children(self, id, depth + 1, &mut stack);
        }

        Ok(TreeOutline {
            entries,
            counts: self.count_nodes(start)?,
        })
    }
}

fn push_children(ns: &Namespace, id: NodeId, depth: usize, stack: &mut Vec<(NodeId, usize, bool)>) {
    let children = ns.children(id);
    let last = children.len().saturating_sub(1);
    for (index, child) in children.iter().enumerate().rev() {
        stack.push((*child, depth, index == last));
    }
}
