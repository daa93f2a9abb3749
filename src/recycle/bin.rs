//! Recycle bin operations on the namespace.
//!
//! A node moves Live -> Bin on soft delete, Bin -> Live on restore, and
//! Bin -> Purged on permanent delete, empty, or reaping. Purging an id that
//! is already gone is a no-op so the reaper and an explicit delete can race
//! freely.

use crate::error::FsError;
use crate::recycle::index::BinEntry;
use crate::tree::namespace::Namespace;
use crate::types::{NodeId, Timestamp};
use chrono::Duration;
use tracing::{debug, info};

/// Result of moving one node into the bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDeleted {
    pub id: NodeId,
    pub original_name: String,
    /// Name inside the bin; differs from `original_name` after a collision.
    pub bin_name: String,
}

impl SoftDeleted {
    pub fn renamed(&self) -> bool {
        self.original_name != self.bin_name
    }
}

/// Result of restoring a node out of the bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restored {
    pub id: NodeId,
    pub parent: NodeId,
    pub name: String,
}

/// What emptying a directory did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyReport {
    pub soft_deleted: Vec<SoftDeleted>,
    pub purged: usize,
}

impl Namespace {
    pub fn bin_entry(&self, id: NodeId) -> Option<&BinEntry> {
        self.deletions.get(id)
    }

    /// Number of nodes currently tracked for reaping.
    pub fn pending_deletions(&self) -> usize {
        self.deletions.len()
    }

    /// First free name in the bin: `name`, then `name_1`, `name_2`, ...
    fn free_bin_name(&self, name: &str) -> String {
        let bin = self.recycle_bin();
        if self.child_named(bin, name).is_none() {
            return name.to_string();
        }
        (1u64..)
            .map(|n| format!("{}_{}", name, n))
            .find(|candidate| self.child_named(bin, candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    /// Move `name` from `parent` into the recycle bin, stamped with `now`.
    pub fn soft_delete(
        &mut self,
        parent: NodeId,
        name: &str,
        now: Timestamp,
    ) -> Result<SoftDeleted, FsError> {
        let bin = self.recycle_bin();
        if self.is_within_bin(parent) {
            return Err(FsError::InRecycleBin(
                "items here can only be restored or permanently deleted".to_string(),
            ));
        }
        let id = self.lookup_by_name(parent, name)?;
        if id == bin {
            return Err(FsError::ProtectedNode(name.to_string()));
        }
        Ok(self.soft_delete_node(parent, id, now))
    }

    fn soft_delete_node(&mut self, parent: NodeId, id: NodeId, now: Timestamp) -> SoftDeleted {
        let original_name = self.name(id).to_string();
        self.detach(parent, id);
        let bin_name = self.free_bin_name(&original_name);
        if let Ok(node) = self.node_mut(id) {
            node.name = bin_name.clone();
        }
        self.attach(self.recycle_bin(), id);
        self.deletions.insert(
            id,
            BinEntry {
                deleted_at: now,
                origin: parent,
                original_name: original_name.clone(),
            },
        );

        info!(
            node = %id,
            from = %self.path_of(parent),
            bin_name = %bin_name,
            "Moved to recycle bin"
        );
        SoftDeleted {
            id,
            original_name,
            bin_name,
        }
    }

    /// Put `name` from the bin back under the parent it was deleted from.
    ///
    /// The original name is preferred; if that is taken the bin name is
    /// kept; if both are taken the restore is refused.
    pub fn restore(&mut self, name: &str) -> Result<Restored, FsError> {
        let bin = self.recycle_bin();
        let id = self
            .child_named(bin, name)
            .ok_or_else(|| FsError::NotInBin(name.to_string()))?;
        let entry = self
            .deletions
            .get(id)
            .cloned()
            .ok_or_else(|| FsError::NotInBin(name.to_string()))?;

        let origin = entry.origin;
        if !self.is_directory(origin) || self.is_within_bin(origin) {
            return Err(FsError::OriginalParentGone(name.to_string()));
        }

        let restored_name = if self.child_named(origin, &entry.original_name).is_none() {
            entry.original_name.clone()
        } else if self.child_named(origin, name).is_none() {
            name.to_string()
        } else {
            return Err(FsError::collision(entry.original_name));
        };

        self.detach(bin, id);
        self.deletions.remove(id);
        if let Ok(node) = self.node_mut(id) {
            node.name = restored_name.clone();
        }
        self.attach(origin, id);

        info!(node = %id, to = %self.path_of(id), "Restored from recycle bin");
        Ok(Restored {
            id,
            parent: origin,
            name: restored_name,
        })
    }

    /// Irreversibly remove `name` from the bin.
    pub fn permanent_delete(&mut self, name: &str) -> Result<(), FsError> {
        let id = self
            .child_named(self.recycle_bin(), name)
            .ok_or_else(|| FsError::NotInBin(name.to_string()))?;
        self.purge(id);
        Ok(())
    }

    /// Remove a binned node and its subtree. Returns false if it was already gone.
    pub fn purge(&mut self, id: NodeId) -> bool {
        let bin = self.recycle_bin();
        self.deletions.remove(id);
        if !self.detach(bin, id) {
            return false;
        }
        let removed = self.drop_subtree(id);
        debug!(node = %id, removed, "Purged from recycle bin");
        true
    }

    /// Purge every bin entry at once. Returns how many top-level items went.
    pub fn empty_bin(&mut self) -> usize {
        let bin = self.recycle_bin();
        let items: Vec<NodeId> = self.children(bin).to_vec();
        for id in &items {
            self.detach(bin, *id);
            self.drop_subtree(*id);
        }
        self.deletions.clear();
        info!(count = items.len(), "Emptied recycle bin");
        items.len()
    }

    /// Route every child of `directory` into the bin, or purge them all if
    /// `directory` is the bin. The bin itself is never moved.
    pub fn empty_directory(
        &mut self,
        directory: NodeId,
        now: Timestamp,
    ) -> Result<EmptyReport, FsError> {
        self.directory(directory)?;
        let bin = self.recycle_bin();
        if directory == bin {
            return Ok(EmptyReport {
                soft_deleted: Vec::new(),
                purged: self.empty_bin(),
            });
        }
        if self.is_within_bin(directory) {
            return Err(FsError::InRecycleBin(
                "restore the directory before emptying it".to_string(),
            ));
        }

        let children: Vec<NodeId> = self
            .children(directory)
            .iter()
            .copied()
            .filter(|c| *c != bin)
            .collect();
        let soft_deleted = children
            .into_iter()
            .map(|id| self.soft_delete_node(directory, id, now))
            .collect();
        Ok(EmptyReport {
            soft_deleted,
            purged: 0,
        })
    }

    /// Purge entries older than `retention` at `now`. Returns purged bin names.
    pub fn sweep_expired(&mut self, now: Timestamp, retention: Duration) -> Vec<String> {
        let expired = self.deletions.expired(now, retention);
        let mut purged = Vec::with_capacity(expired.len());
        for id in expired {
            let name = self.name(id).to_string();
            if self.purge(id) {
                purged.push(name);
            }
        }
        purged
    }
}
