use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use treeshell::recycle::{ManualClock, ReaperConfig};
use treeshell::shell::{Outcome, PendingAction, Session};

fn fast_reaper() -> ReaperConfig {
    ReaperConfig {
        retention: chrono::Duration::seconds(120),
        poll_interval: Duration::from_millis(5),
    }
}

fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(2) {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    check()
}

fn create_and_delete(session: &mut Session, name: &str) {
    if let Outcome::NeedsText(request) = session.execute(&format!("cat {}", name)) {
        session.supply_text(request, "data".to_string());
    }
    if let Outcome::Confirm(action) = session.execute(&format!("rm {}", name)) {
        session.confirm(action, true);
    }
}

#[test]
fn background_reaper_purges_after_window() {
    let clock = ManualClock::default();
    let mut session = Session::start("tester", Arc::new(clock.clone()), fast_reaper()).unwrap();
    create_and_delete(&mut session, "a");
    let namespace = session.namespace();

    clock.advance(chrono::Duration::seconds(120));
    thread::sleep(Duration::from_millis(40));
    assert_eq!(namespace.lock().pending_deletions(), 1);

    clock.advance(chrono::Duration::seconds(1));
    assert!(eventually(|| namespace.lock().pending_deletions() == 0));
    let ns = namespace.lock();
    assert!(ns.children(ns.recycle_bin()).is_empty());
    drop(ns);

    session.shutdown();
    assert!(!session.reaper_running());
}

#[test]
fn explicit_purge_racing_the_reaper_never_fails() {
    let clock = ManualClock::default();
    let mut session = Session::start("tester", Arc::new(clock.clone()), fast_reaper()).unwrap();
    let names: Vec<String> = (0..25).map(|i| format!("f{}", i)).collect();
    for name in &names {
        create_and_delete(&mut session, name);
    }
    session.execute("cd recycle_bin");
    let bin = session.cwd();

    clock.advance(chrono::Duration::seconds(500));
    for name in &names {
        let action = PendingAction::Remove {
            directory: bin,
            name: name.clone(),
            permanent: true,
        };
        let outcome = session.confirm(action, true);
        assert!(!outcome.is_failure(), "{:?}", outcome);
    }

    let namespace = session.namespace();
    assert!(eventually(|| namespace.lock().pending_deletions() == 0));
    session.shutdown();
}

#[test]
fn restore_before_window_survives_reaper() {
    let clock = ManualClock::default();
    let mut session = Session::start("tester", Arc::new(clock.clone()), fast_reaper()).unwrap();
    create_and_delete(&mut session, "keep");
    clock.advance(chrono::Duration::seconds(60));

    session.execute("cd recycle_bin");
    assert!(!session.execute("restore keep").is_failure());
    session.execute("cd ..");

    clock.advance(chrono::Duration::seconds(600));
    thread::sleep(Duration::from_millis(40));
    let namespace = session.namespace();
    let ns = namespace.lock();
    assert!(ns.child_named(ns.root(), "keep").is_some());
}
