//! Deletion index
//!
//! Auxiliary map from a binned node to when and where it was deleted from.
//! Only direct children of the recycle bin have entries.

use crate::types::{NodeId, Timestamp};
use chrono::Duration;
use std::collections::HashMap;

/// Bookkeeping for one soft-deleted node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinEntry {
    /// When the node was soft-deleted; retention is measured from here.
    pub deleted_at: Timestamp,
    /// Parent the node had at deletion time.
    pub origin: NodeId,
    /// Name before any collision suffix was applied.
    pub original_name: String,
}

#[derive(Debug, Default)]
pub struct DeletionIndex {
    entries: HashMap<NodeId, BinEntry>,
}

impl DeletionIndex {
    pub fn get(&self, id: NodeId) -> Option<&BinEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn insert(&mut self, id: NodeId, entry: BinEntry) {
        self.entries.insert(id, entry);
    }

    pub fn remove(&mut self, id: NodeId) -> Option<BinEntry> {
        self.entries.remove(&id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids whose age at `now` is strictly greater than `retention`, oldest first.
    pub fn expired(&self, now: Timestamp, retention: Duration) -> Vec<NodeId> {
        let mut expired: Vec<(Timestamp, NodeId)> = self
            .entries
            .iter()
            .filter(|(_, entry)| now.signed_duration_since(entry.deleted_at) > retention)
            .map(|(id, entry)| (entry.deleted_at, *id))
            .collect();
        expired.sort();
        expired.into_iter().map(|(_, id)| id).collect()
    }
}
