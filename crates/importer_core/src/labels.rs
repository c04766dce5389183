use std::time::Duration;

use crate::{FollowUp, RunClassification};

pub(crate) const IDLE: &str = "Sync inventory for all accounts";
pub(crate) const AUTO_IMPORTING: &str = "Auto-importing...";
pub(crate) const STARTING: &str = "Starting import...";
pub(crate) const CONFIG_EMPTY: &str = "Error: no accounts configured";

pub(crate) fn importing(total: usize) -> String {
    format!("Importing {total} accounts...")
}

pub(crate) fn settled(classification: RunClassification, follow_up: FollowUp) -> String {
    let message = match classification {
        RunClassification::ConfigEmpty => return CONFIG_EMPTY.to_string(),
        RunClassification::Success { total } => format!("All imports succeeded ({total})!"),
        RunClassification::Error { successful, failed } => {
            format!("Import finished: {successful} succeeded, {failed} failed")
        }
    };
    let hint = match follow_up {
        FollowUp::Reload { after } => format!(" (reloading in {}s)", seconds(after)),
        FollowUp::RevertToIdle { .. } => " (no reload)".to_string(),
    };
    message + &hint
}

fn seconds(duration: Duration) -> f64 {
    duration.as_millis() as f64 / 1000.0
}
