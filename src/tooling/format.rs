//! Render outcomes and the prompt as terminal text.

use crate::error::Rejection;
use crate::shell::{Outcome, Prompt};
use crate::tree::{EntryKind, ListEntry};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Text renderer. With `color` off every string is plain.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    color: bool,
}

impl Formatter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// `@user [line] $directory`
    pub fn prompt(&self, prompt: &Prompt) -> String {
        if !self.color {
            return format!("@{} [{}] ${}", prompt.user, prompt.line, prompt.directory);
        }
        format!(
            "{} {} {}",
            format!("@{}", prompt.user).green(),
            format!("[{}]", prompt.line).yellow(),
            format!("${}", prompt.directory).cyan()
        )
    }

    pub fn heading(&self, title: &str) -> String {
        if self.color {
            format!("{}", title.bold().underline())
        } else {
            title.to_string()
        }
    }

    pub fn error(&self, rejection: &Rejection) -> String {
        let text = format!("Error: {}", rejection);
        if self.color {
            format!("{}", text.red())
        } else {
            text
        }
    }

    /// Text for outcomes that only need printing; `None` for the rest.
    pub fn render(&self, outcome: &Outcome) -> Option<String> {
        let text = match outcome {
            Outcome::Message(message) => message.clone(),
            Outcome::Listing { directory, entries } => self.listing(directory, entries),
            Outcome::Tree(outline) => outline.to_string(),
            Outcome::Contents { name, text } => {
                format!("{}\n{}", self.heading(name), text)
            }
            Outcome::Counts { directory, counts } => format!(
                "'{}' holds {} file(s) and {} director{} (itself included).",
                directory,
                counts.files,
                counts.directories,
                if counts.directories == 1 { "y" } else { "ies" }
            ),
            Outcome::Help(entries) => {
                let mut table = Table::new();
                table.load_preset(UTF8_BORDERS_ONLY);
                table.set_header(vec!["Command", "Description"]);
                for (usage, description) in entries.iter() {
                    table.add_row(vec![*usage, *description]);
                }
                table.to_string()
            }
            Outcome::Whoami { user } => format!("You are logged in as {}.", user),
            Outcome::Failure(rejection) => self.error(rejection),
            Outcome::Nothing
            | Outcome::Confirm(_)
            | Outcome::NeedsText(_)
            | Outcome::ChooseFileAction { .. }
            | Outcome::RunScript(_)
            | Outcome::Clear
            | Outcome::Exit
            | Outcome::Logout => return None,
        };
        Some(text)
    }

    fn listing(&self, directory: &str, entries: &[ListEntry]) -> String {
        if entries.is_empty() {
            return format!("'{}' is empty.", directory);
        }
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Kind"]);
        for entry in entries {
            let name = match entry.kind {
                EntryKind::Directory if self.color => format!("{}", entry.name.blue().bold()),
                _ => entry.name.clone(),
            };
            table.add_row(vec![name, entry.kind.to_string()]);
        }
        table.to_string()
    }
}
