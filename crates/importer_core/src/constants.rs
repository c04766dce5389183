use std::time::Duration;

/// Stable identifier of the single import control.
pub const CONTROL_ID: &str = "seelie-api-importer-btn";

/// Delay between page-ready and the automatic run, so host setup can settle.
pub const AUTO_RUN_DELAY: Duration = Duration::from_millis(500);

/// Delay before reloading after a run that wrote at least one account.
pub const RELOAD_DELAY: Duration = Duration::from_millis(1000);

/// How long a settled label stays visible when no reload follows.
pub const REVERT_DELAY: Duration = Duration::from_millis(3000);
