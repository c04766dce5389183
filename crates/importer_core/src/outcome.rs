use std::fmt;
use std::time::Duration;

use crate::constants::{RELOAD_DELAY, REVERT_DELAY};
use crate::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigEmpty,
    NetworkError,
    HttpError(u16),
    ParseError,
    SchemaError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigEmpty => write!(f, "no accounts configured"),
            ErrorKind::NetworkError => write!(f, "network error"),
            ErrorKind::HttpError(status) => write!(f, "http status {status}"),
            ErrorKind::ParseError => write!(f, "response is not valid json"),
            ErrorKind::SchemaError => write!(f, "missing inventory array"),
        }
    }
}

/// Result of importing one account. Produced once per account per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success {
        account_id: AccountId,
    },
    /// The account has no storage slots; nothing was fetched.
    Skipped {
        account_id: AccountId,
    },
    Failure {
        account_id: AccountId,
        kind: ErrorKind,
        detail: String,
    },
}

impl FetchOutcome {
    pub fn account_id(&self) -> &str {
        match self {
            FetchOutcome::Success { account_id }
            | FetchOutcome::Skipped { account_id }
            | FetchOutcome::Failure { account_id, .. } => account_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Aggregate counts for one run.
///
/// `successful + failed + skipped == total` always holds: outcomes that never
/// arrived are counted as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl ImportSummary {
    /// Summary of a run over an empty account config.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn tally(total: usize, outcomes: &[FetchOutcome]) -> Self {
        let mut summary = Self {
            total,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Success { .. } => summary.successful += 1,
                FetchOutcome::Skipped { .. } => summary.skipped += 1,
                FetchOutcome::Failure { .. } => summary.failed += 1,
            }
        }
        let unresolved = total.saturating_sub(outcomes.len());
        summary.failed += unresolved;
        summary
    }

    /// Skipped accounts count as neither success nor failure, so a run with any
    /// skipped account classifies as `Error` even if nothing failed.
    pub fn classify(&self) -> RunClassification {
        if self.total == 0 {
            RunClassification::ConfigEmpty
        } else if self.successful == self.total {
            RunClassification::Success { total: self.total }
        } else {
            RunClassification::Error {
                successful: self.successful,
                failed: self.failed,
            }
        }
    }

    /// Reload when anything was written; otherwise leave the result on screen
    /// and fall back to idle.
    pub fn follow_up(&self) -> FollowUp {
        if self.successful > 0 {
            FollowUp::Reload {
                after: RELOAD_DELAY,
            }
        } else {
            FollowUp::RevertToIdle {
                after: REVERT_DELAY,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunClassification {
    ConfigEmpty,
    Success { total: usize },
    Error { successful: usize, failed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Reload { after: Duration },
    RevertToIdle { after: Duration },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(id: &str) -> FetchOutcome {
        FetchOutcome::Failure {
            account_id: id.to_string(),
            kind: ErrorKind::HttpError(500),
            detail: "500 Internal Server Error".to_string(),
        }
    }

    #[test]
    fn unresolved_outcomes_count_as_failed() {
        let outcomes = vec![FetchOutcome::Success {
            account_id: "a".into(),
        }];
        let summary = ImportSummary::tally(3, &outcomes);
        assert_eq!(summary.successful, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.successful + summary.failed + summary.skipped, 3);
    }

    #[test]
    fn all_skipped_classifies_as_error() {
        let outcomes = vec![
            FetchOutcome::Skipped {
                account_id: "a".into(),
            },
            FetchOutcome::Skipped {
                account_id: "b".into(),
            },
        ];
        let summary = ImportSummary::tally(2, &outcomes);
        assert_eq!(
            summary.classify(),
            RunClassification::Error {
                successful: 0,
                failed: 0
            }
        );
        assert_eq!(
            summary.follow_up(),
            FollowUp::RevertToIdle {
                after: REVERT_DELAY
            }
        );
    }

    #[test]
    fn partial_success_still_reloads() {
        let outcomes = vec![
            FetchOutcome::Success {
                account_id: "a".into(),
            },
            failure("b"),
        ];
        let summary = ImportSummary::tally(2, &outcomes);
        assert!(matches!(summary.classify(), RunClassification::Error { .. }));
        assert_eq!(
            summary.follow_up(),
            FollowUp::Reload {
                after: RELOAD_DELAY
            }
        );
    }

    #[test]
    fn empty_config_is_its_own_classification() {
        let summary = ImportSummary::empty();
        assert_eq!(summary.classify(), RunClassification::ConfigEmpty);
        assert!(matches!(summary.follow_up(), FollowUp::RevertToIdle { .. }));
    }
}
