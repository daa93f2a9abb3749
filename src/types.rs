//! Core types shared across the namespace, recycle bin, and shell layers.

use chrono::{DateTime, Utc};
use std::fmt;

/// NodeId: handle of a node in the namespace arena.
///
/// Ids are handed out monotonically and never reused within a session, so a
/// handle that outlives its node simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Timestamp: wall-clock instant used for deletion bookkeeping.
pub type Timestamp = DateTime<Utc>;
