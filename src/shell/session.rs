//! Interactive session
//!
//! A session owns the shared namespace, the current directory cursor, and the
//! background reaper. It never reads input or renders output: every step
//! returns an [`Outcome`] and follow-up answers (confirmations, file text)
//! come back through [`Session::confirm`] and [`Session::supply_text`].

use crate::error::{FsError, Rejection, Result};
use crate::recycle::{Clock, Reaper, ReaperConfig, SharedNamespace};
use crate::shell::command::{Command, FileAction, COMMAND_NAMES, HELP_ENTRIES};
use crate::shell::outcome::{Outcome, PendingAction, TextRequest};
use crate::tree::similarity::{closest_match, SUGGESTION_CUTOFF};
use crate::tree::Namespace;
use crate::types::NodeId;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

const FILE_ACTIONS: &[FileAction] = &[FileAction::View, FileAction::Edit, FileAction::Overwrite];

/// Data the presentation layer needs to draw a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub user: String,
    /// Number the next line will get.
    pub line: u64,
    pub directory: String,
}

pub struct Session {
    namespace: SharedNamespace,
    clock: Arc<dyn Clock>,
    retention: chrono::Duration,
    reaper: Option<Reaper>,
    cursor: NodeId,
    user: String,
    line_number: u64,
}

impl Session {
    /// Fresh namespace plus a running reaper.
    pub fn start(
        user: impl Into<String>,
        clock: Arc<dyn Clock>,
        config: ReaperConfig,
    ) -> Result<Self> {
        let mut session = Self::detached(user, clock, config.retention);
        let reaper = Reaper::start(
            Arc::clone(&session.namespace),
            Arc::clone(&session.clock),
            config,
        )?;
        session.reaper = Some(reaper);
        info!(user = %session.user, "Session started");
        Ok(session)
    }

    /// Session without a background reaper. Expired entries are only purged
    /// by [`Session::reap_now`].
    pub fn detached(
        user: impl Into<String>,
        clock: Arc<dyn Clock>,
        retention: chrono::Duration,
    ) -> Self {
        let namespace = Namespace::new();
        let cursor = namespace.root();
        Self {
            namespace: Arc::new(Mutex::new(namespace)),
            clock,
            retention,
            reaper: None,
            cursor,
            user: user.into(),
            line_number: 0,
        }
    }

    pub fn namespace(&self) -> SharedNamespace {
        Arc::clone(&self.namespace)
    }

    pub fn cwd(&self) -> NodeId {
        self.cursor
    }

    pub fn cwd_path(&self) -> String {
        self.namespace.lock().path_of(self.cursor)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn reaper_running(&self) -> bool {
        self.reaper.as_ref().is_some_and(Reaper::is_running)
    }

    pub fn prompt(&self) -> Prompt {
        let directory = self.namespace.lock().name(self.cursor).to_string();
        Prompt {
            user: self.user.clone(),
            line: self.line_number + 1,
            directory,
        }
    }

    /// Parse and run one line.
    pub fn execute(&mut self, line: &str) -> Outcome {
        self.line_number += 1;
        match Command::parse(line) {
            Ok(command) => self.execute_command(command),
            Err(err) => err.into(),
        }
    }

    pub fn execute_command(&mut self, command: Command) -> Outcome {
        debug!(line = self.line_number, ?command, "Executing command");
        let namespace = Arc::clone(&self.namespace);
        let mut ns = namespace.lock();
        if !ns.contains(self.cursor) {
            warn!(cursor = %self.cursor, "Current directory vanished, returning to root");
            self.cursor = ns.root();
        }

        match self.dispatch(&mut ns, command) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                debug!(error = %rejection, "Command rejected");
                Outcome::Failure(rejection)
            }
        }
    }

    fn dispatch(
        &mut self,
        ns: &mut Namespace,
        command: Command,
    ) -> std::result::Result<Outcome, Rejection> {
        let cwd = self.cursor;
        let outcome = match command {
            Command::Noop => Outcome::Nothing,
            Command::Exit => Outcome::Exit,
            Command::Clear => Outcome::Clear,
            Command::Logout => Outcome::Logout,
            Command::Help => Outcome::Help(HELP_ENTRIES),
            Command::Whoami => Outcome::Whoami {
                user: self.user.clone(),
            },
            Command::Bash(script) => Outcome::RunScript(script),
            Command::Unknown(word) => {
                let hint = closest_match(
                    &word.to_lowercase(),
                    COMMAND_NAMES.iter().copied(),
                    SUGGESTION_CUTOFF,
                )
                .map(str::to_string);
                return Err(Rejection::with_hint(FsError::UnknownCommand(word), hint));
            }

            Command::Mkdir(name) => {
                ns.create_directory(cwd, &name)?;
                Outcome::message(format!("Directory '{}' created.", name))
            }
            Command::Tree { from_root } => {
                let start = if from_root { ns.root() } else { cwd };
                Outcome::Tree(ns.outline(start)?)
            }
            Command::Ls => Outcome::Listing {
                directory: ns.name(cwd).to_string(),
                entries: ns.list(cwd)?,
            },
            Command::Count => Outcome::Counts {
                directory: ns.name(cwd).to_string(),
                counts: ns.count_nodes(cwd)?,
            },
            Command::Cd(target) => {
                self.cursor = if target == ".." {
                    ns.navigate_up(cwd)?
                } else {
                    ns.navigate_into(cwd, &target)
                        .map_err(|e| with_sibling_hint(ns, cwd, &target, e))?
                };
                Outcome::Nothing
            }
            Command::Rename { from, to } => {
                ns.rename(cwd, &from, &to)?;
                Outcome::message(format!("Renamed '{}' to '{}'.", from, to))
            }

            Command::Cat { name, action } => match ns.open_file(cwd, &name)? {
                Some(file) => match action {
                    Some(action) => file_step(ns, file, action)?,
                    None => Outcome::ChooseFileAction {
                        file,
                        name,
                        choices: FILE_ACTIONS,
                    },
                },
                None if action.is_some() => {
                    return Err(with_sibling_hint(ns, cwd, &name, FsError::not_found(&name)))
                }
                None if ns.is_within_bin(cwd) => {
                    return Err(FsError::InRecycleBin(
                        "new files cannot be created here".to_string(),
                    )
                    .into())
                }
                None => Outcome::NeedsText(TextRequest::NewFile {
                    directory: cwd,
                    name,
                }),
            },

            Command::Rm(name) => {
                let id = ns
                    .lookup_by_name(cwd, &name)
                    .map_err(|e| with_sibling_hint(ns, cwd, &name, e))?;
                if id == ns.recycle_bin() {
                    return Err(FsError::ProtectedNode(name).into());
                }
                Outcome::Confirm(PendingAction::Remove {
                    directory: cwd,
                    name,
                    permanent: cwd == ns.recycle_bin(),
                })
            }
            Command::Empty => {
                let bin = ns.recycle_bin();
                if cwd == bin {
                    if ns.children(bin).is_empty() {
                        Outcome::message("The recycle bin is already empty.")
                    } else {
                        Outcome::Confirm(PendingAction::EmptyBin)
                    }
                } else if ns.children(cwd).iter().all(|c| *c == bin) {
                    Outcome::message(format!("'{}' is already empty.", ns.name(cwd)))
                } else {
                    Outcome::Confirm(PendingAction::EmptyDirectory {
                        directory: cwd,
                        name: ns.name(cwd).to_string(),
                    })
                }
            }
            Command::Restore(name) => {
                if cwd != ns.recycle_bin() {
                    return Err(FsError::bad_arguments(
                        "restore only works from inside the recycle bin",
                    )
                    .into());
                }
                let restored = ns.restore(&name)?;
                Outcome::message(format!(
                    "Restored '{}' to '{}'.",
                    restored.name,
                    ns.path_of(restored.parent)
                ))
            }

            Command::Cp { name, destination } => {
                ns.copy(cwd, &name, &destination)?;
                Outcome::message(format!("Copied '{}' into '{}'.", name, destination))
            }
            Command::Mv { name, destination } => {
                ns.move_node(cwd, &name, &destination)?;
                Outcome::message(format!("Moved '{}' into '{}'.", name, destination))
            }
        };
        Ok(outcome)
    }

    /// Apply or cancel a confirmed destructive step.
    ///
    /// A node the reaper already purged is reported as gone, not as an error.
    pub fn confirm(&mut self, action: PendingAction, accepted: bool) -> Outcome {
        if !accepted {
            return Outcome::message("Cancelled. Nothing was deleted.");
        }
        let now = self.clock.now();
        let mut ns = self.namespace.lock();

        match action {
            PendingAction::Remove {
                name,
                permanent: true,
                ..
            } => {
                let bin = ns.recycle_bin();
                let purged = ns.child_named(bin, &name).is_some_and(|id| ns.purge(id));
                if purged {
                    Outcome::message(format!("'{}' was permanently deleted.", name))
                } else {
                    Outcome::message(format!(
                        "'{}' was already purged from the recycle bin.",
                        name
                    ))
                }
            }
            PendingAction::Remove {
                directory, name, ..
            } => match ns.soft_delete(directory, &name, now) {
                Ok(deleted) if deleted.renamed() => Outcome::message(format!(
                    "'{}' was moved to the recycle bin as '{}'.",
                    deleted.original_name, deleted.bin_name
                )),
                Ok(_) => Outcome::message(format!("'{}' was moved to the recycle bin.", name)),
                Err(FsError::NotFound(_)) => {
                    Outcome::message(format!("'{}' is already gone.", name))
                }
                Err(err) => err.into(),
            },
            PendingAction::EmptyBin => {
                let purged = ns.empty_bin();
                Outcome::message(format!(
                    "Recycle bin emptied, {} item(s) permanently deleted.",
                    purged
                ))
            }
            PendingAction::EmptyDirectory { directory, name } => {
                match ns.empty_directory(directory, now) {
                    Ok(report) => {
                        let mut text = format!(
                            "Moved {} item(s) from '{}' to the recycle bin.",
                            report.soft_deleted.len(),
                            name
                        );
                        for renamed in report.soft_deleted.iter().filter(|d| d.renamed()) {
                            text.push_str(&format!(
                                "\n'{}' is stored as '{}'.",
                                renamed.original_name, renamed.bin_name
                            ));
                        }
                        Outcome::Message(text)
                    }
                    Err(err) => err.into(),
                }
            }
        }
    }

    /// Finish a command that was waiting for file text.
    pub fn supply_text(&mut self, request: TextRequest, text: String) -> Outcome {
        let mut ns = self.namespace.lock();
        let result = match request {
            TextRequest::NewFile { directory, name } => ns
                .create_file(directory, &name, text)
                .map(|_| format!("File '{}' created.", name)),
            TextRequest::Override { file, name } | TextRequest::Edit { file, name, .. } => ns
                .write_file(file, text)
                .map(|_| format!("File '{}' saved.", name)),
        };
        match result {
            Ok(message) => Outcome::Message(message),
            Err(err) => err.into(),
        }
    }

    /// Answer to [`Outcome::ChooseFileAction`].
    pub fn file_action(&mut self, file: NodeId, action: FileAction) -> Outcome {
        let ns = self.namespace.lock();
        file_step(&ns, file, action).unwrap_or_else(Outcome::from)
    }

    /// Sweep expired bin entries right now. Returns the purged names.
    pub fn reap_now(&self) -> Vec<String> {
        self.namespace
            .lock()
            .sweep_expired(self.clock.now(), self.retention)
    }

    /// Stop the reaper and wait for it. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(mut reaper) = self.reaper.take() {
            reaper.stop();
            info!(user = %self.user, lines = self.line_number, "Session ended");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn file_step(ns: &Namespace, file: NodeId, action: FileAction) -> std::result::Result<Outcome, FsError> {
    let name = ns.name(file).to_string();
    let current = ns.contents(file)?;
    if action != FileAction::View && ns.is_within_bin(file) {
        return Err(FsError::InRecycleBin(format!(
            "restore '{}' before changing it",
            name
        )));
    }
    let outcome = match action {
        FileAction::View => Outcome::Contents {
            name,
            text: current.to_string(),
        },
        FileAction::Edit => Outcome::NeedsText(TextRequest::Edit {
            file,
            name,
            current: current.to_string(),
        }),
        FileAction::Overwrite => Outcome::NeedsText(TextRequest::Override { file, name }),
    };
    Ok(outcome)
}

fn with_sibling_hint(ns: &Namespace, directory: NodeId, name: &str, error: FsError) -> Rejection {
    if !matches!(error, FsError::NotFound(_)) {
        return error.into();
    }
    let hint = closest_match(
        name,
        ns.children(directory).iter().map(|c| ns.name(*c)),
        SUGGESTION_CUTOFF,
    )
    .map(str::to_string);
    Rejection::with_hint(error, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recycle::ManualClock;
    use crate::tree::RECYCLE_BIN_NAME;

    fn session() -> (Session, ManualClock) {
        let clock = ManualClock::default();
        let session = Session::detached("alice", Arc::new(clock.clone()), chrono::Duration::seconds(120));
        (session, clock)
    }

    fn new_file(session: &mut Session, name: &str, text: &str) {
        match session.execute(&format!("cat {}", name)) {
            Outcome::NeedsText(request) => {
                session.supply_text(request, text.to_string());
            }
            other => panic!("expected text request, got {:?}", other),
        }
    }

    fn confirm_yes(session: &mut Session, line: &str) -> Outcome {
        match session.execute(line) {
            Outcome::Confirm(action) => session.confirm(action, true),
            other => panic!("expected confirmation, got {:?}", other),
        }
    }

    fn listing(session: &mut Session) -> Vec<String> {
        match session.execute("ls") {
            Outcome::Listing { entries, .. } => entries.into_iter().map(|e| e.name).collect(),
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn test_line_counter_and_prompt() {
        let (mut session, _) = session();
        assert_eq!(session.prompt().line, 1);
        session.execute("");
        session.execute("ls");
        let prompt = session.prompt();
        assert_eq!(prompt.line, 3);
        assert_eq!(prompt.user, "alice");
        assert_eq!(prompt.directory, "root");
    }

    #[test]
    fn test_unknown_command_suggests() {
        let (mut session, _) = session();
        let outcome = session.execute("mkdri foo");
        match outcome {
            Outcome::Failure(rejection) => {
                assert_eq!(rejection.error, FsError::UnknownCommand("mkdri".to_string()));
                assert_eq!(rejection.hint.as_deref(), Some("mkdir"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cd_round_trip_and_root_guard() {
        let (mut session, _) = session();
        session.execute("mkdir docs");
        assert!(matches!(session.execute("cd docs"), Outcome::Nothing));
        assert_eq!(session.prompt().directory, "docs");
        session.execute("cd ..");
        assert_eq!(session.cwd_path(), "root");
        session.execute("cd docs");
        assert_eq!(session.cwd_path(), "root/docs");
        session.execute("cd ..");
        assert_eq!(session.execute("cd ..").error(), Some(&FsError::AtRoot));
    }

    #[test]
    fn test_cat_create_view_edit() {
        let (mut session, _) = session();
        new_file(&mut session, "notes", "one");
        match session.execute("cat notes -v") {
            Outcome::Contents { text, .. } => assert_eq!(text, "one"),
            other => panic!("unexpected {:?}", other),
        }
        match session.execute("cat notes -e") {
            Outcome::NeedsText(request @ TextRequest::Edit { .. }) => {
                if let TextRequest::Edit { current, .. } = &request {
                    assert_eq!(current, "one");
                }
                session.supply_text(request, "two".to_string());
            }
            other => panic!("unexpected {:?}", other),
        }
        let file = match session.execute("cat notes") {
            Outcome::ChooseFileAction { file, choices, .. } => {
                assert_eq!(choices.len(), 3);
                file
            }
            other => panic!("unexpected {:?}", other),
        };
        match session.file_action(file, FileAction::View) {
            Outcome::Contents { text, .. } => assert_eq!(text, "two"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cat_on_directory_is_refused() {
        let (mut session, _) = session();
        session.execute("mkdir docs");
        assert_eq!(
            session.execute("cat docs").error(),
            Some(&FsError::IsADirectory("docs".to_string()))
        );
    }

    #[test]
    fn test_rm_needs_confirmation() {
        let (mut session, _) = session();
        session.execute("mkdir docs");
        match session.execute("rm docs") {
            Outcome::Confirm(action) => {
                session.confirm(action, false);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(listing(&mut session), vec![RECYCLE_BIN_NAME, "docs"]);

        confirm_yes(&mut session, "rm docs");
        assert_eq!(listing(&mut session), vec![RECYCLE_BIN_NAME]);
    }

    #[test]
    fn test_rm_recycle_bin_is_protected() {
        let (mut session, _) = session();
        assert!(matches!(
            session.execute("rm recycle_bin").error(),
            Some(FsError::ProtectedNode(_))
        ));
    }

    #[test]
    fn test_restore_only_from_bin() {
        let (mut session, _) = session();
        new_file(&mut session, "a", "x");
        confirm_yes(&mut session, "rm a");
        assert!(matches!(
            session.execute("restore a").error(),
            Some(FsError::BadArguments(_))
        ));

        session.execute("cd recycle_bin");
        assert!(!session.execute("restore a").is_failure());
        session.execute("cd ..");
        assert_eq!(listing(&mut session), vec![RECYCLE_BIN_NAME, "a"]);
    }

    #[test]
    fn test_permanent_delete_after_reap_is_not_an_error() {
        let (mut session, clock) = session();
        new_file(&mut session, "a", "x");
        confirm_yes(&mut session, "rm a");
        session.execute("cd recycle_bin");

        let pending = match session.execute("rm a") {
            Outcome::Confirm(action) => action,
            other => panic!("unexpected {:?}", other),
        };
        clock.advance(chrono::Duration::seconds(121));
        assert_eq!(session.reap_now(), vec!["a".to_string()]);

        let outcome = session.confirm(pending, true);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_empty_current_directory_and_bin() {
        let (mut session, _) = session();
        session.execute("mkdir a");
        session.execute("mkdir b");
        confirm_yes(&mut session, "empty");
        assert_eq!(listing(&mut session), vec![RECYCLE_BIN_NAME]);

        session.execute("cd recycle_bin");
        assert_eq!(listing(&mut session), vec!["a", "b"]);
        confirm_yes(&mut session, "empty");
        assert!(listing(&mut session).is_empty());
        assert!(matches!(session.execute("empty"), Outcome::Message(_)));
    }

    #[test]
    fn test_rm_missing_suggests_sibling() {
        let (mut session, _) = session();
        session.execute("mkdir barn");
        match session.execute("rm bar") {
            Outcome::Failure(rejection) => assert_eq!(rejection.hint.as_deref(), Some("barn")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut session = Session::start(
            "bob",
            Arc::new(ManualClock::default()),
            ReaperConfig::default(),
        )
        .unwrap();
        assert!(session.reaper_running());
        session.shutdown();
        session.shutdown();
        assert!(!session.reaper_running());
    }
}
