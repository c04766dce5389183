use importer_core::{FetchOutcome, ImportSummary};
use thiserror::Error;

/// Sequence number of an accepted import run.
pub type RunId = u64;

/// Status and body of one answered request. Any status is a valid response here;
/// the account fetcher decides what counts as success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The request never produced a response (DNS, connection, TLS, invalid URL).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunRejected {
    #[error("an import run is already in progress")]
    AlreadyRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    RunStarted { run: RunId, total: usize },
    AccountSettled { run: RunId, outcome: FetchOutcome },
    RunFinished { run: RunId, summary: ImportSummary },
    RunRejected,
}
