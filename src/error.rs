//! Error types for the namespace and the shell around it.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Recoverable namespace errors.
///
/// Every variant is reported back to the caller inside an outcome; none of
/// them ends the session.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("no such file or directory '{0}'")]
    NotFound(String),

    #[error("a file or directory named '{0}' already exists")]
    NameCollision(String),

    /// The recycle bin or the root refused the operation.
    #[error("'{0}' is protected")]
    ProtectedNode(String),

    /// The recycle bin only holds soft-deleted items.
    #[error("not allowed inside the recycle bin: {0}")]
    InRecycleBin(String),

    #[error("'{0}' is not in the recycle bin")]
    NotInBin(String),

    #[error("the original location of '{0}' no longer exists")]
    OriginalParentGone(String),

    #[error("'{0}' is not a directory")]
    NotADirectory(String),

    #[error("'{0}' is a directory")]
    IsADirectory(String),

    #[error("a name is required")]
    EmptyName,

    #[error("invalid arguments: {0}")]
    BadArguments(String),

    #[error("already at the root directory")]
    AtRoot,

    #[error("cannot place '{0}' inside itself")]
    InvalidDestination(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

impl FsError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn collision(name: impl Into<String>) -> Self {
        Self::NameCollision(name.into())
    }

    pub fn bad_arguments(usage: impl Into<String>) -> Self {
        Self::BadArguments(usage.into())
    }
}

/// A refused operation plus an optional "did you mean" hint.
///
/// The hint never blocks a retry; it is only surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub error: FsError,
    pub hint: Option<String>,
}

impl Rejection {
    pub fn with_hint(error: FsError, hint: Option<String>) -> Self {
        Self { error, hint }
    }
}

impl From<FsError> for Rejection {
    fn from(error: FsError) -> Self {
        Self { error, hint: None }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{}. Did you mean '{}'?", self.error, hint),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for Rejection {}

/// Crate-level error for everything outside the tree itself.
#[derive(thiserror::Error, Debug)]
pub enum ShellError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error while accessing {}", .0.display())]
    Io(PathBuf, #[source] io::Error),

    /// A background worker could not be started or stopped cleanly.
    #[error("background worker failed: {0}")]
    Worker(String),

    /// Interactive input could not be read.
    #[error("failed to read user input: {0}")]
    Prompt(String),

    #[error(transparent)]
    Fs(#[from] FsError),
}

impl ShellError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }
}

impl From<config::ConfigError> for ShellError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Shared result alias for the crate.
pub type Result<T> = std::result::Result<T, ShellError>;
