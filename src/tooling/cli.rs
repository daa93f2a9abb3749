//! CLI Tooling
//!
//! Command-line entry for the treeshell binary: flag parsing, configuration
//! with CLI overrides, and the interactive or scripted session drivers.

use crate::config::{ConfigLoader, ShellConfig};
use crate::error::{Result, ShellError};
use crate::recycle::SystemClock;
use crate::shell::Session;
use crate::tooling::format::Formatter;
use crate::tooling::repl::{resolve_script, BatchTerminal, DialoguerTerminal, Flow, Repl};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Treeshell - an in-memory filesystem with a recycle bin
#[derive(Parser, Debug)]
#[command(name = "treeshell")]
#[command(about = "In-memory filesystem shell with a time-limited recycle bin")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Name shown in the prompt (default: $USER)
    #[arg(long, short)]
    pub user: Option<String>,

    /// Configuration file path, layered above the global config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seconds a deleted item stays restorable
    #[arg(long)]
    pub retention_secs: Option<u32>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive shell (the default)
    Shell,
    /// Run a script of shell commands and exit
    Run {
        /// Script file; `<name>.txt` is tried when `<name>` does not exist
        script: String,
        /// Answer yes to every confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Resolved configuration plus the user label.
pub struct CliContext {
    config: ShellConfig,
    user: String,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &cli.config {
            loader = loader.with_file(path);
        }
        let mut config = loader.load()?;
        apply_overrides(&mut config, cli);
        config.validate()?;

        Ok(Self {
            config,
            user: resolve_user(cli.user.as_deref()),
        })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.color)
    }

    fn start_session(&self, user: &str) -> Result<Session> {
        Session::start(user, Arc::new(SystemClock), self.config.reaper_config())
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Config => self.config.to_toml(),
            Commands::Run { script, yes } => self.run_script(script, *yes),
            Commands::Shell => self.run_interactive(),
        }
    }

    fn run_script(&self, script: &str, assume_yes: bool) -> Result<String> {
        if resolve_script(script).is_none() {
            return Err(ShellError::io(
                script,
                io::Error::new(io::ErrorKind::NotFound, "script not found"),
            ));
        }
        let session = self.start_session(&self.user)?;
        let mut repl = Repl::new(
            session,
            BatchTerminal { assume_yes },
            self.formatter(),
        );
        let flow = repl.run_script(script)?;
        let session = repl.finish();
        info!(script, ?flow, lines = session.line_number(), "Script finished");
        Ok(format!("Script '{}' finished.", script))
    }

    fn run_interactive(&self) -> Result<String> {
        let mut user = self.user.clone();
        loop {
            let session = self.start_session(&user)?;
            let mut repl = Repl::new(session, DialoguerTerminal, self.formatter());
            println!("Welcome, {}. Type 'help' to see the available commands.", user);
            let flow = repl.run()?;
            repl.finish();

            match flow {
                Flow::Logout => {
                    user = ask_user(&user)?;
                }
                Flow::Exit | Flow::Continue => return Ok("Goodbye.".to_string()),
            }
        }
    }
}

fn ask_user(previous: &str) -> Result<String> {
    println!("Logged out.");
    dialoguer::Input::new()
        .with_prompt("Username")
        .default(previous.to_string())
        .interact_text()
        .map_err(|e| ShellError::Prompt(e.to_string()))
}

/// Fold CLI flags into the loaded configuration; flags win.
pub(crate) fn apply_overrides(config: &mut ShellConfig, cli: &Cli) {
    if let Some(secs) = cli.retention_secs {
        config.retention_secs = secs;
    }
    if cli.no_color {
        config.color = false;
        config.logging.color = false;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        config.logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
}

/// `--user`, then `$USER`/`$USERNAME`, then "guest".
pub(crate) fn resolve_user(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "guest".to_string())
}
