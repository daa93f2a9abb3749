use std::sync::Arc;

use treeshell::error::FsError;
use treeshell::recycle::ManualClock;
use treeshell::shell::{Outcome, Session};
use treeshell::tree::RECYCLE_BIN_NAME;

fn session() -> (Session, ManualClock) {
    let clock = ManualClock::default();
    let session = Session::detached(
        "tester",
        Arc::new(clock.clone()),
        chrono::Duration::seconds(120),
    );
    (session, clock)
}

fn run(session: &mut Session, line: &str) -> Outcome {
    match session.execute(line) {
        Outcome::Confirm(action) => session.confirm(action, true),
        Outcome::NeedsText(request) => session.supply_text(request, String::new()),
        other => other,
    }
}

fn write_file(session: &mut Session, name: &str, text: &str) {
    match session.execute(&format!("cat {}", name)) {
        Outcome::NeedsText(request) => {
            let outcome = session.supply_text(request, text.to_string());
            assert!(!outcome.is_failure(), "{:?}", outcome);
        }
        other => panic!("expected a text request, got {:?}", other),
    }
}

fn ls(session: &mut Session) -> Vec<String> {
    match session.execute("ls") {
        Outcome::Listing { entries, .. } => entries.into_iter().map(|e| e.name).collect(),
        other => panic!("expected a listing, got {:?}", other),
    }
}

fn read(session: &mut Session, name: &str) -> String {
    match session.execute(&format!("cat {} -v", name)) {
        Outcome::Contents { text, .. } => text,
        other => panic!("expected contents, got {:?}", other),
    }
}

#[test]
fn deleted_file_is_purged_after_retention() {
    let (mut session, clock) = session();
    run(&mut session, "mkdir docs");
    run(&mut session, "cd docs");
    write_file(&mut session, "a", "hello");
    run(&mut session, "rm a");
    assert!(ls(&mut session).is_empty());

    run(&mut session, "cd ..");
    run(&mut session, "cd recycle_bin");
    assert_eq!(ls(&mut session), vec!["a"]);

    clock.advance(chrono::Duration::seconds(119));
    assert!(session.reap_now().is_empty());
    assert_eq!(ls(&mut session), vec!["a"]);

    clock.advance(chrono::Duration::seconds(2));
    assert_eq!(session.reap_now(), vec!["a".to_string()]);
    assert!(ls(&mut session).is_empty());

    let namespace = session.namespace();
    let ns = namespace.lock();
    assert!(ns.find_recursive(ns.root(), "a").is_err());
}

#[test]
fn second_mkdir_collides_and_leaves_tree_unchanged() {
    let (mut session, _) = session();
    assert!(!run(&mut session, "mkdir foo").is_failure());
    let before = session.namespace().lock().len();

    let outcome = run(&mut session, "mkdir foo");
    assert_eq!(outcome.error(), Some(&FsError::NameCollision("foo".to_string())));
    assert_eq!(session.namespace().lock().len(), before);
    assert_eq!(ls(&mut session), vec![RECYCLE_BIN_NAME, "foo"]);
}

#[test]
fn rename_of_missing_name_suggests_sibling() {
    let (mut session, _) = session();
    run(&mut session, "mkdir barn");

    match run(&mut session, "rname bar baz") {
        Outcome::Failure(rejection) => {
            assert_eq!(rejection.error, FsError::NotFound("bar".to_string()));
            assert_eq!(rejection.hint.as_deref(), Some("barn"));
        }
        other => panic!("expected a rejection, got {:?}", other),
    }
    assert_eq!(ls(&mut session), vec![RECYCLE_BIN_NAME, "barn"]);
}

#[test]
fn rename_collision_wins_over_missing_source() {
    let (mut session, _) = session();
    run(&mut session, "mkdir baz");
    let outcome = run(&mut session, "rname nothing baz");
    assert_eq!(outcome.error(), Some(&FsError::NameCollision("baz".to_string())));
}

#[test]
fn copy_is_reachable_from_both_and_independent() {
    let (mut session, _) = session();
    run(&mut session, "mkdir a");
    run(&mut session, "mkdir b");
    run(&mut session, "cd a");
    write_file(&mut session, "x", "original");
    assert!(!run(&mut session, "cp x b").is_failure());
    assert_eq!(ls(&mut session), vec!["x"]);

    run(&mut session, "cd ..");
    run(&mut session, "cd b");
    assert_eq!(ls(&mut session), vec!["x"]);
    match session.execute("cat x -o") {
        Outcome::NeedsText(request) => {
            session.supply_text(request, "changed".to_string());
        }
        other => panic!("unexpected {:?}", other),
    }

    run(&mut session, "cd ..");
    run(&mut session, "cd a");
    assert_eq!(read(&mut session, "x"), "original");
}

#[test]
fn move_leaves_a_single_owner() {
    let (mut session, _) = session();
    run(&mut session, "mkdir a");
    run(&mut session, "mkdir b");
    run(&mut session, "cd a");
    run(&mut session, "mkdir x");
    assert!(!run(&mut session, "mv x b").is_failure());
    assert!(ls(&mut session).is_empty());

    run(&mut session, "cd ..");
    run(&mut session, "cd b");
    assert_eq!(ls(&mut session), vec!["x"]);
}

#[test]
fn restore_returns_to_original_parent() {
    let (mut session, _) = session();
    run(&mut session, "mkdir docs");
    run(&mut session, "cd docs");
    write_file(&mut session, "a", "hello");
    run(&mut session, "rm a");
    write_file(&mut session, "b", "");
    run(&mut session, "cd ..");

    run(&mut session, "cd recycle_bin");
    assert!(!run(&mut session, "restore a").is_failure());
    assert!(ls(&mut session).is_empty());

    run(&mut session, "cd ..");
    run(&mut session, "cd docs");
    assert_eq!(ls(&mut session), vec!["b", "a"]);
    assert_eq!(read(&mut session, "a"), "hello");
}

#[test]
fn restore_fails_when_original_parent_was_purged() {
    let (mut session, _) = session();
    run(&mut session, "mkdir docs");
    run(&mut session, "mkdir other");
    run(&mut session, "cd docs");
    write_file(&mut session, "a", "");
    run(&mut session, "rm a");
    run(&mut session, "cd ..");
    run(&mut session, "rm docs");

    run(&mut session, "cd recycle_bin");
    run(&mut session, "rm docs");
    let outcome = run(&mut session, "restore a");
    assert_eq!(
        outcome.error(),
        Some(&FsError::OriginalParentGone("a".to_string()))
    );
}

#[test]
fn repeated_deletes_get_incrementing_suffixes() {
    let (mut session, _) = session();
    for _ in 0..3 {
        write_file(&mut session, "a", "");
        run(&mut session, "rm a");
    }
    run(&mut session, "cd recycle_bin");
    assert_eq!(ls(&mut session), vec!["a", "a_1", "a_2"]);
}

#[test]
fn bin_refuses_new_content() {
    let (mut session, _) = session();
    run(&mut session, "cd recycle_bin");
    assert!(matches!(
        run(&mut session, "mkdir new").error(),
        Some(FsError::InRecycleBin(_))
    ));
    assert!(matches!(
        run(&mut session, "cat new").error(),
        Some(FsError::InRecycleBin(_))
    ));
}

#[test]
fn count_includes_starting_directory() {
    let (mut session, _) = session();
    run(&mut session, "mkdir docs");
    run(&mut session, "cd docs");
    run(&mut session, "mkdir inner");
    write_file(&mut session, "a", "");
    match run(&mut session, "count") {
        Outcome::Counts { counts, .. } => {
            assert_eq!(counts.directories, 2);
            assert_eq!(counts.files, 1);
        }
        other => panic!("unexpected {:?}", other),
    }
}
