use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use treeshell::tree::Namespace;
use treeshell::types::{NodeId, Timestamp};

#[derive(Debug, Clone)]
enum Op {
    Mkdir(usize, String),
    File(usize, String),
    Rename(usize, String, String),
    Move(usize, String, String),
    Copy(usize, String, String),
    Delete(usize, String),
    Restore(String),
}

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "ab", "docs", "a_1"]).prop_map(str::to_string)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), name()).prop_map(|(d, n)| Op::Mkdir(d, n)),
        (any::<usize>(), name()).prop_map(|(d, n)| Op::File(d, n)),
        (any::<usize>(), name(), name()).prop_map(|(d, a, b)| Op::Rename(d, a, b)),
        (any::<usize>(), name(), name()).prop_map(|(d, a, b)| Op::Move(d, a, b)),
        (any::<usize>(), name(), name()).prop_map(|(d, a, b)| Op::Copy(d, a, b)),
        (any::<usize>(), name()).prop_map(|(d, n)| Op::Delete(d, n)),
        name().prop_map(Op::Restore),
    ]
}

/// Every directory reachable from the root, the bin included.
fn directories(ns: &Namespace) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack = vec![ns.root()];
    while let Some(id) = stack.pop() {
        if ns.is_directory(id) {
            found.push(id);
            stack.extend(ns.children(id).iter().copied());
        }
    }
    found
}

fn live_directories(ns: &Namespace) -> Vec<NodeId> {
    directories(ns)
        .into_iter()
        .filter(|d| !ns.is_within_bin(*d))
        .collect()
}

fn apply(ns: &mut Namespace, op: &Op) {
    let dirs = live_directories(ns);
    let pick = |index: usize| dirs[index % dirs.len()];
    // Rejected operations are part of the exercise; only the shape matters.
    match op {
        Op::Mkdir(d, n) => {
            let _ = ns.create_directory(pick(*d), n);
        }
        Op::File(d, n) => {
            let _ = ns.create_file(pick(*d), n, "text");
        }
        Op::Rename(d, a, b) => {
            let _ = ns.rename(pick(*d), a, b);
        }
        Op::Move(d, a, b) => {
            let _ = ns.move_node(pick(*d), a, b);
        }
        Op::Copy(d, a, b) => {
            let _ = ns.copy(pick(*d), a, b);
        }
        Op::Delete(d, n) => {
            let _ = ns.soft_delete(pick(*d), n, now());
        }
        Op::Restore(n) => {
            let _ = ns.restore(n);
        }
    }
}

fn assert_tree_consistent(ns: &Namespace) {
    for dir in directories(ns) {
        let mut seen = HashSet::new();
        for child in ns.children(dir) {
            assert!(
                seen.insert(ns.name(*child).to_string()),
                "duplicate name '{}' under {}",
                ns.name(*child),
                ns.path_of(dir)
            );
            assert_eq!(ns.parent(*child), Some(dir));
        }
    }
}

proptest! {
    #[test]
    fn sibling_names_stay_unique(ops in prop::collection::vec(op(), 1..60)) {
        let mut ns = Namespace::new();
        for op in &ops {
            apply(&mut ns, op);
            assert_tree_consistent(&ns);
        }
    }

    #[test]
    fn soft_delete_then_restore_round_trips(
        names in prop::collection::hash_set("[a-z]{1,6}", 1..8),
        pick in any::<prop::sample::Index>(),
        nested in any::<bool>(),
    ) {
        let mut ns = Namespace::new();
        let root = ns.root();
        let parent = if nested {
            ns.create_directory(root, "holder").unwrap()
        } else {
            root
        };
        let names: Vec<String> = names
            .into_iter()
            .filter(|n| n != "recycle_bin" && n != "holder")
            .collect();
        prop_assume!(!names.is_empty());
        for (i, name) in names.iter().enumerate() {
            if i % 2 == 0 {
                ns.create_directory(parent, name).unwrap();
            } else {
                ns.create_file(parent, name, "body").unwrap();
            }
        }

        let target = pick.get(&names).clone();
        let id = ns.child_named(parent, &target).unwrap();
        let order_before: Vec<String> = ns.list(parent).unwrap().into_iter().map(|e| e.name).collect();

        let deleted = ns.soft_delete(parent, &target, now()).unwrap();
        prop_assert!(ns.child_named(parent, &target).is_none());
        let restored = ns.restore(&deleted.bin_name).unwrap();

        prop_assert_eq!(restored.id, id);
        prop_assert_eq!(restored.parent, parent);
        prop_assert_eq!(restored.name, target.clone());
        prop_assert_eq!(ns.pending_deletions(), 0);

        let mut order_after: Vec<String> = ns.list(parent).unwrap().into_iter().map(|e| e.name).collect();
        let mut expected = order_before;
        expected.sort();
        order_after.sort();
        prop_assert_eq!(order_after, expected);
    }
}
