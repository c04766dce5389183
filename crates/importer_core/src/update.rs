use crate::labels;
use crate::{AppState, ControlState, Effect, FollowUp, Msg, RunClassification, AUTO_RUN_DELAY};
use std::time::Duration;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PageReady { auto_run } => {
            if auto_run {
                // Show busy right away so the idle label never flashes before the run.
                state.transition(ControlState::Busy, labels::AUTO_IMPORTING);
                vec![Effect::StartRun {
                    delay: AUTO_RUN_DELAY,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::TriggerActivated => {
            if state.control() == ControlState::Busy {
                return (state, Vec::new());
            }
            state.transition(ControlState::Busy, labels::STARTING);
            vec![Effect::StartRun {
                delay: Duration::ZERO,
            }]
        }
        Msg::RunStarted { total } => {
            state.transition(ControlState::Busy, labels::importing(total));
            Vec::new()
        }
        Msg::RunFinished(summary) => {
            let classification = summary.classify();
            let follow_up = summary.follow_up();
            let control = match classification {
                RunClassification::Success { .. } => ControlState::SettledSuccess,
                RunClassification::ConfigEmpty | RunClassification::Error { .. } => {
                    ControlState::SettledError
                }
            };
            let generation = state.settle(
                summary,
                control,
                labels::settled(classification, follow_up),
            );
            match follow_up {
                FollowUp::Reload { after } => vec![Effect::ScheduleReload { after }],
                FollowUp::RevertToIdle { after } => {
                    vec![Effect::ScheduleRevert { generation, after }]
                }
            }
        }
        Msg::RevertElapsed { generation } => {
            if generation == state.generation() && state.control().is_settled() {
                state.transition(ControlState::Idle, labels::IDLE);
            }
            Vec::new()
        }
        Msg::RunRejected => {
            // A rejected request never produces a RunFinished of its own.
            if state.control() == ControlState::Busy {
                state.transition(ControlState::Idle, labels::IDLE);
            }
            Vec::new()
        }
    };

    (state, effects)
}
