//! Command interpreter: parsing, outcomes, and the session cursor.

pub mod command;
pub mod outcome;
pub mod session;

pub use command::{Command, FileAction, COMMAND_NAMES, HELP_ENTRIES};
pub use outcome::{Outcome, PendingAction, TextRequest};
pub use session::{Prompt, Session};
