use crate::labels;
use crate::view_model::{AppViewModel, ControlView};
use crate::{ImportSummary, CONTROL_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlState {
    #[default]
    Idle,
    Busy,
    SettledSuccess,
    SettledError,
}

impl ControlState {
    pub fn is_settled(self) -> bool {
        matches!(self, ControlState::SettledSuccess | ControlState::SettledError)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    control: ControlState,
    label: String,
    /// Bumped on every settle so a stale revert timer cannot clobber a newer run.
    generation: u64,
    last_summary: Option<ImportSummary>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            control: ControlState::Idle,
            label: labels::IDLE.to_string(),
            generation: 0,
            last_summary: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            control: ControlView {
                control_id: CONTROL_ID,
                state: self.control,
                label: self.label.clone(),
                category: self.control.into(),
                enabled: self.control != ControlState::Busy,
            },
            last_summary: self.last_summary,
            dirty: self.dirty,
        }
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// State and label always change together.
    pub(crate) fn transition(&mut self, control: ControlState, label: impl Into<String>) {
        let label = label.into();
        if self.control == control && self.label == label {
            return;
        }
        self.control = control;
        self.label = label;
        self.dirty = true;
    }

    pub(crate) fn settle(
        &mut self,
        summary: ImportSummary,
        control: ControlState,
        label: String,
    ) -> u64 {
        self.generation += 1;
        self.last_summary = Some(summary);
        self.transition(control, label);
        self.dirty = true;
        self.generation
    }
}
