//! What a command produced, for the presentation layer to render.

use crate::error::{FsError, Rejection};
use crate::shell::command::FileAction;
use crate::tree::{ListEntry, NodeCounts, TreeOutline};
use crate::types::NodeId;

/// Result of one interpreter step.
///
/// Destructive commands never run straight away: they come back as
/// [`Outcome::Confirm`] and take effect through `Session::confirm`.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Blank line; nothing to show.
    Nothing,
    Message(String),
    Listing {
        directory: String,
        entries: Vec<ListEntry>,
    },
    Tree(TreeOutline),
    Contents {
        name: String,
        text: String,
    },
    Counts {
        directory: String,
        counts: NodeCounts,
    },
    Help(&'static [(&'static str, &'static str)]),
    Whoami {
        user: String,
    },
    Failure(Rejection),
    Confirm(PendingAction),
    NeedsText(TextRequest),
    /// `cat` on an existing file without a flag.
    ChooseFileAction {
        file: NodeId,
        name: String,
        choices: &'static [FileAction],
    },
    RunScript(String),
    Clear,
    Exit,
    Logout,
}

impl Outcome {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn error(&self) -> Option<&FsError> {
        match self {
            Self::Failure(rejection) => Some(&rejection.error),
            _ => None,
        }
    }
}

impl From<FsError> for Outcome {
    fn from(error: FsError) -> Self {
        Self::Failure(error.into())
    }
}

impl From<Rejection> for Outcome {
    fn from(rejection: Rejection) -> Self {
        Self::Failure(rejection)
    }
}

/// A destructive step waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Soft delete from `directory`, or purge when `permanent` (directory is the bin).
    Remove {
        directory: NodeId,
        name: String,
        permanent: bool,
    },
    EmptyBin,
    EmptyDirectory { directory: NodeId, name: String },
}

impl PendingAction {
    /// Question to put to the user.
    pub fn description(&self) -> String {
        match self {
            Self::Remove {
                name,
                permanent: true,
                ..
            } => format!("Permanently delete '{}'? This cannot be undone.", name),
            Self::Remove { name, .. } => {
                format!("Delete '{}'? It will be moved to the recycle bin.", name)
            }
            Self::EmptyBin => {
                "Permanently delete everything in the recycle bin? This cannot be undone."
                    .to_string()
            }
            Self::EmptyDirectory { name, .. } => format!(
                "Delete all contents of '{}'? They will be moved to the recycle bin.",
                name
            ),
        }
    }
}

/// File text the interpreter needs before it can finish a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextRequest {
    NewFile { directory: NodeId, name: String },
    Override { file: NodeId, name: String },
    /// `current` is shown so it can be edited.
    Edit {
        file: NodeId,
        name: String,
        current: String,
    },
}

impl TextRequest {
    pub fn file_name(&self) -> &str {
        match self {
            Self::NewFile { name, .. } | Self::Override { name, .. } | Self::Edit { name, .. } => {
                name
            }
        }
    }
}
