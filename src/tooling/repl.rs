//! Read-eval-print loop around a [`Session`].
//!
//! All terminal interaction goes through [`Terminal`] so the same loop drives
//! an interactive dialoguer prompt, a non-interactive script run, and tests.

use crate::error::{FsError, Result, ShellError};
use crate::shell::{Outcome, Session, TextRequest};
use crate::tooling::format::Formatter;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Line that ends file text input.
pub const END_OF_TEXT: &str = ":q";

/// Scripts may call `bash` themselves; nesting stops here.
const MAX_SCRIPT_DEPTH: usize = 8;

/// Terminal I/O used by the loop.
pub trait Terminal {
    /// Next input line, or `None` when input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
    fn confirm(&mut self, question: &str) -> Result<bool>;
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize>;
    fn print(&mut self, text: &str);
    fn clear(&mut self);
}

/// Interactive terminal backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerTerminal;

fn prompt_error(err: dialoguer::Error) -> ShellError {
    ShellError::Prompt(err.to_string())
}

impl Terminal for DialoguerTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let line: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_error)?;
        Ok(Some(line))
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }

    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<usize> {
        dialoguer::Select::new()
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(prompt_error)
    }

    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn clear(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

/// Non-interactive terminal for `treeshell run`: no input lines, confirmations
/// answered with `assume_yes`, the first choice picked for selections.
#[derive(Debug, Default)]
pub struct BatchTerminal {
    pub assume_yes: bool,
}

impl Terminal for BatchTerminal {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        println!("{} {}", question, if self.assume_yes { "[yes]" } else { "[no]" });
        Ok(self.assume_yes)
    }

    fn select(&mut self, _prompt: &str, _items: &[&str]) -> Result<usize> {
        Ok(0)
    }

    fn print(&mut self, text: &str) {
        println!("{}", text);
    }

    fn clear(&mut self) {}
}

/// How a loop ended, or that it should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
    Logout,
}

/// Where follow-up lines (file text) come from.
enum Feed<'a> {
    Terminal,
    Script(&'a mut std::vec::IntoIter<String>),
}

pub struct Repl<T: Terminal> {
    session: Session,
    terminal: T,
    formatter: Formatter,
    script_depth: usize,
}

impl<T: Terminal> Repl<T> {
    pub fn new(session: Session, terminal: T, formatter: Formatter) -> Self {
        Self {
            session,
            terminal,
            formatter,
            script_depth: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Stop the reaper and hand the session back.
    pub fn finish(mut self) -> Session {
        self.session.shutdown();
        self.session
    }

    /// Read and run lines until exit, logout, or end of input.
    pub fn run(&mut self) -> Result<Flow> {
        loop {
            let prompt = self.formatter.prompt(&self.session.prompt());
            let Some(line) = self.terminal.read_line(&prompt)? else {
                return Ok(Flow::Exit);
            };
            match self.handle_line(&line, &mut Feed::Terminal)? {
                Flow::Continue => {}
                flow => return Ok(flow),
            }
        }
    }

    /// Replay a script file line by line, echoing each line after the prompt.
    ///
    /// `name` is tried as given and then with `.txt` appended.
    pub fn run_script(&mut self, name: &str) -> Result<Flow> {
        let Some(path) = resolve_script(name) else {
            let rejection = FsError::not_found(name).into();
            self.terminal.print(&self.formatter.error(&rejection));
            return Ok(Flow::Continue);
        };
        if self.script_depth >= MAX_SCRIPT_DEPTH {
            warn!(script = %path.display(), "Script nesting too deep");
            let rejection =
                FsError::bad_arguments(format!("scripts nest deeper than {}", MAX_SCRIPT_DEPTH))
                    .into();
            self.terminal.print(&self.formatter.error(&rejection));
            return Ok(Flow::Continue);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ShellError::io(&path, e))?;
        info!(script = %path.display(), "Running script");
        let mut lines = content
            .lines()
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into_iter();

        self.script_depth += 1;
        let mut flow = Flow::Continue;
        while let Some(line) = lines.next() {
            let prompt = self.formatter.prompt(&self.session.prompt());
            self.terminal.print(&format!("{} {}", prompt, line));
            flow = self.handle_line(&line, &mut Feed::Script(&mut lines))?;
            if flow != Flow::Continue {
                break;
            }
        }
        self.script_depth -= 1;
        Ok(flow)
    }

    fn handle_line(&mut self, line: &str, feed: &mut Feed<'_>) -> Result<Flow> {
        let outcome = self.session.execute(line);
        self.handle_outcome(outcome, feed)
    }

    fn handle_outcome(&mut self, outcome: Outcome, feed: &mut Feed<'_>) -> Result<Flow> {
        let next = match outcome {
            Outcome::Confirm(action) => {
                let accepted = self.terminal.confirm(&action.description())?;
                self.session.confirm(action, accepted)
            }
            Outcome::NeedsText(request) => {
                if let TextRequest::Edit { name, current, .. } = &request {
                    self.terminal
                        .print(&format!("{}\n{}", self.formatter.heading(name), current));
                }
                self.terminal.print(&format!(
                    "Enter the text for '{}', end with {} on its own line.",
                    request.file_name(),
                    END_OF_TEXT
                ));
                let text = self.collect_text(feed)?;
                self.session.supply_text(request, text)
            }
            Outcome::ChooseFileAction {
                file,
                name,
                choices,
            } => {
                let labels: Vec<&str> = choices.iter().map(|c| c.label()).collect();
                let index = self
                    .terminal
                    .select(&format!("What do you want to do with '{}'?", name), &labels)?;
                match choices.get(index) {
                    Some(action) => self.session.file_action(file, *action),
                    None => Outcome::Nothing,
                }
            }
            Outcome::RunScript(name) => return self.run_script(&name),
            Outcome::Clear => {
                self.terminal.clear();
                return Ok(Flow::Continue);
            }
            Outcome::Exit => return Ok(Flow::Exit),
            Outcome::Logout => return Ok(Flow::Logout),
            other => {
                if let Some(text) = self.formatter.render(&other) {
                    self.terminal.print(&text);
                }
                return Ok(Flow::Continue);
            }
        };
        self.handle_outcome(next, feed)
    }

    /// Lines up to (not including) the end marker, joined with newlines.
    fn collect_text(&mut self, feed: &mut Feed<'_>) -> Result<String> {
        let mut lines = Vec::new();
        loop {
            let next = match feed {
                Feed::Terminal => self.terminal.read_line(">")?,
                Feed::Script(script) => script.next(),
            };
            match next {
                Some(line) if line.trim() == END_OF_TEXT => break,
                Some(line) => lines.push(line),
                None => {
                    debug!("Input ended before the end-of-text marker");
                    break;
                }
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Script path for `name`, trying it as given and then with `.txt` appended.
pub fn resolve_script(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }
    let with_ext = PathBuf::from(format!("{}.txt", name));
    with_ext.is_file().then_some(with_ext)
}
