//! Tooling & Integration Layer
//!
//! The presentation collaborator around the core: the clap CLI, the
//! read-eval-print loop with its terminal adapters, and text formatting.

pub mod cli;
pub mod format;
pub mod repl;

pub use cli::{Cli, CliContext, Commands};
pub use format::Formatter;
pub use repl::{BatchTerminal, DialoguerTerminal, Flow, Repl, Terminal};
