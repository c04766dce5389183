use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the engine to run every configured account once `delay` has passed.
    StartRun { delay: Duration },
    /// Reload the host (reset all in-memory state) after `after`.
    ScheduleReload { after: Duration },
    /// Deliver `Msg::RevertElapsed { generation }` after `after`.
    ScheduleRevert { generation: u64, after: Duration },
}
