use std::sync::Arc;

use importer_engine::{
    FileSessionStore, MemorySessionStore, SessionGate, SessionStore, SESSION_KEY,
};
use tempfile::TempDir;

fn exercise_gate(gate: &SessionGate) {
    assert!(gate.should_auto_run());

    gate.mark_run();
    assert!(!gate.should_auto_run());

    // Idempotent.
    gate.mark_run();
    assert!(!gate.should_auto_run());

    gate.reset().unwrap();
    assert!(gate.should_auto_run());
}

#[test]
fn memory_gate_closes_after_mark() {
    exercise_gate(&SessionGate::new(Arc::new(MemorySessionStore::new())));
}

#[test]
fn file_gate_closes_after_mark() {
    let temp = TempDir::new().unwrap();
    exercise_gate(&SessionGate::new(Arc::new(FileSessionStore::new(
        temp.path().join("session"),
    ))));
}

#[test]
fn marker_survives_a_reload() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("session");

    SessionGate::new(Arc::new(FileSessionStore::new(dir.clone()))).mark_run();

    // A fresh gate over the same session directory, as after a reload.
    let reloaded = SessionGate::new(Arc::new(FileSessionStore::new(dir)));
    assert!(!reloaded.should_auto_run());
}

#[test]
fn only_the_true_marker_closes_the_gate() {
    let store = Arc::new(MemorySessionStore::new());
    store.set(SESSION_KEY, "false").unwrap();
    let gate = SessionGate::new(store.clone());
    assert!(gate.should_auto_run());

    store.set(SESSION_KEY, "true").unwrap();
    assert!(!gate.should_auto_run());
}

#[test]
fn clearing_missing_marker_is_fine() {
    let temp = TempDir::new().unwrap();
    let store = FileSessionStore::new(temp.path().to_path_buf());
    store.clear(SESSION_KEY).unwrap();
    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
}

#[test]
fn unwritable_marker_is_logged_and_gate_stays_open() {
    importer_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let not_a_dir = temp.path().join("session");
    std::fs::write(&not_a_dir, "x").unwrap();
    let gate = SessionGate::new(Arc::new(FileSessionStore::new(not_a_dir)));

    gate.mark_run();

    assert!(gate.should_auto_run());
}
