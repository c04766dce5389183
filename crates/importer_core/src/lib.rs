//! Importer core: shared data model and the pure control state machine.
mod config;
mod constants;
mod effect;
mod labels;
mod msg;
mod outcome;
mod state;
mod update;
mod view_model;

pub use config::{AccountConfig, AccountId};
pub use constants::{AUTO_RUN_DELAY, CONTROL_ID, RELOAD_DELAY, REVERT_DELAY};
pub use effect::Effect;
pub use msg::Msg;
pub use outcome::{ErrorKind, FetchOutcome, FollowUp, ImportSummary, RunClassification};
pub use state::{AppState, ControlState};
pub use update::update;
pub use view_model::{AppViewModel, ControlView, VisualCategory};
