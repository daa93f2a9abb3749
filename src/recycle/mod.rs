//! Recycle bin subsystem
//!
//! Soft delete, restore, permanent delete, and emptying live on
//! [`Namespace`](crate::tree::Namespace); the deletion index and the
//! background [`Reaper`] that enforces the retention window live here.

mod bin;
pub mod clock;
mod index;
pub mod reaper;

pub use bin::{EmptyReport, Restored, SoftDeleted};
pub use clock::{Clock, ManualClock, SystemClock};
pub use index::{BinEntry, DeletionIndex};
pub use reaper::{Reaper, ReaperConfig, SharedNamespace};
