use importer_core::{update, AppState, Msg};

#[test]
fn run_rejected_leaves_state_untouched() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::RunRejected);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
