//! Command line parsing.
//!
//! A line is split on whitespace; the first word names the command and is
//! matched case-insensitively. Commands that take a single free-form name
//! (`mkdir`, `cd`, `bash`) keep the rest of the line, spaces included.

use crate::error::FsError;

/// Every command word the interpreter understands.
pub const COMMAND_NAMES: &[&str] = &[
    "bash", "cat", "cd", "clear", "cls", "count", "cp", "empty", "exit", "help", "logout", "ls",
    "mkdir", "mv", "restore", "rm", "rname", "tree", "whoami",
];

/// Usage and description for `help`, in display order.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("bash <script>", "Replay commands from a script file"),
    ("cat <file> [-v|-e|-o]", "Create a file, or view, edit, or overwrite one"),
    ("cd <dir> | cd ..", "Enter a directory or go up one level"),
    ("cls", "Clear the screen"),
    ("count", "Count files and directories below here"),
    ("cp <name> <dest>", "Copy a file or directory into <dest>"),
    ("empty", "Move everything here to the recycle bin (or purge the bin)"),
    ("exit", "Exit the terminal"),
    ("help", "Display this help message"),
    ("logout", "Log out of the terminal"),
    ("ls", "List the current directory"),
    ("mkdir <name>", "Create a new directory"),
    ("mv <name> <dest>", "Move a file or directory into <dest>"),
    ("restore <name>", "Restore an item from the recycle bin"),
    ("rm <name>", "Delete to the recycle bin (or purge from it)"),
    ("rname <old> <new>", "Rename a file or directory"),
    ("tree [root]", "Display the directory structure"),
    ("whoami", "Show the current user"),
];

/// How `cat` should treat an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    View,
    Edit,
    Overwrite,
}

impl FileAction {
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "-v" => Some(Self::View),
            "-e" => Some(Self::Edit),
            "-o" => Some(Self::Overwrite),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Overwrite => "overwrite",
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Noop,
    Exit,
    Clear,
    Logout,
    Help,
    Whoami,
    Mkdir(String),
    Tree {
        from_root: bool,
    },
    Cat {
        name: String,
        action: Option<FileAction>,
    },
    Cd(String),
    Rename {
        from: String,
        to: String,
    },
    Ls,
    Rm(String),
    Cp {
        name: String,
        destination: String,
    },
    Mv {
        name: String,
        destination: String,
    },
    Empty,
    Restore(String),
    Count,
    Bash(String),
    Unknown(String),
}

impl Command {
    /// Parse one line. Malformed arguments yield `EmptyName`/`BadArguments`.
    pub fn parse(line: &str) -> Result<Self, FsError> {
        let line = line.trim();
        let Some(word) = line.split_whitespace().next() else {
            return Ok(Self::Noop);
        };
        let rest = line[word.len()..].trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_lowercase().as_str() {
            "exit" => Self::Exit,
            "cls" | "clear" => Self::Clear,
            "logout" => Self::Logout,
            "help" => Self::Help,
            "whoami" => Self::Whoami,
            "ls" => Self::Ls,
            "empty" => Self::Empty,
            "count" => Self::Count,
            "mkdir" => Self::Mkdir(required(rest)?),
            "cd" => Self::Cd(required(rest)?),
            "bash" => Self::Bash(required(rest)?),
            "tree" => match args.as_slice() {
                [] => Self::Tree { from_root: false },
                ["root"] => Self::Tree { from_root: true },
                _ => return Err(FsError::bad_arguments("usage: tree [root]")),
            },
            "cat" => match args.as_slice() {
                [] => return Err(FsError::EmptyName),
                [name] => Self::Cat {
                    name: name.to_string(),
                    action: None,
                },
                [name, flag] => Self::Cat {
                    name: name.to_string(),
                    action: Some(FileAction::from_flag(flag).ok_or_else(|| {
                        FsError::bad_arguments("usage: cat <file> [-v|-e|-o]")
                    })?),
                },
                _ => return Err(FsError::bad_arguments("usage: cat <file> [-v|-e|-o]")),
            },
            "rname" => match args.as_slice() {
                [from, to] => Self::Rename {
                    from: from.to_string(),
                    to: to.to_string(),
                },
                _ => return Err(FsError::bad_arguments("usage: rname <old_name> <new_name>")),
            },
            "rm" => Self::Rm(single(&args, "usage: rm <name>")?),
            "restore" => Self::Restore(single(&args, "usage: restore <name>")?),
            "cp" => {
                let (name, destination) = pair(&args, "usage: cp <name> <destination>")?;
                Self::Cp { name, destination }
            }
            "mv" => {
                let (name, destination) = pair(&args, "usage: mv <name> <destination>")?;
                Self::Mv { name, destination }
            }
            _ => Self::Unknown(word.to_string()),
        };
        Ok(command)
    }
}

fn required(rest: &str) -> Result<String, FsError> {
    if rest.is_empty() {
        return Err(FsError::EmptyName);
    }
    Ok(rest.to_string())
}

fn single(args: &[&str], usage: &str) -> Result<String, FsError> {
    match args {
        [] => Err(FsError::EmptyName),
        [name] => Ok(name.to_string()),
        _ => Err(FsError::bad_arguments(usage)),
    }
}

fn pair(args: &[&str], usage: &str) -> Result<(String, String), FsError> {
    match args {
        [first, second] => Ok((first.to_string(), second.to_string())),
        _ => Err(FsError::bad_arguments(usage)),
    }
}
