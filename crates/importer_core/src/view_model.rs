use crate::ControlState;

/// Visual class of the control; always derived from the same state as the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualCategory {
    #[default]
    None,
    Loading,
    Success,
    Error,
}

impl From<ControlState> for VisualCategory {
    fn from(state: ControlState) -> Self {
        match state {
            ControlState::Idle => VisualCategory::None,
            ControlState::Busy => VisualCategory::Loading,
            ControlState::SettledSuccess => VisualCategory::Success,
            ControlState::SettledError => VisualCategory::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub control_id: &'static str,
    pub state: ControlState,
    pub label: String,
    pub category: VisualCategory,
    /// The trigger is inert while a run is in flight.
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub control: ControlView,
    pub last_summary: Option<crate::ImportSummary>,
    pub dirty: bool,
}
