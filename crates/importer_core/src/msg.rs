use crate::ImportSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host finished loading. `auto_run` is the session gate's verdict.
    PageReady { auto_run: bool },
    /// User activated the import control.
    TriggerActivated,
    /// Engine accepted a run over `total` accounts.
    RunStarted { total: usize },
    /// Engine finished a run; every account has settled.
    RunFinished(ImportSummary),
    /// Engine refused a run because another one is still in flight.
    RunRejected,
    /// A scheduled revert-to-idle timer fired.
    RevertElapsed { generation: u64 },
}
