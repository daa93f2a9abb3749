//! Treeshell: an in-memory filesystem shell
//!
//! A mutable tree of files and directories with rename, copy, move, and a
//! recycle bin whose entries are purged by a background reaper once the
//! retention window has passed. The [`shell::Session`] maps command lines to
//! namespace operations; [`tooling`] supplies the terminal around it.

pub mod config;
pub mod error;
pub mod logging;
pub mod recycle;
pub mod shell;
pub mod tooling;
pub mod transfer;
pub mod tree;
pub mod types;

pub use error::{FsError, Rejection, ShellError};
pub use shell::{Outcome, Session};
pub use tree::Namespace;
