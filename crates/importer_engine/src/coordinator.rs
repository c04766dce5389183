use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::future::join_all;
use importer_core::{AccountConfig, FollowUp, ImportSummary, RunClassification};
use importer_logging::{importer_info, importer_warn, set_run_id};

use crate::{AccountFetcher, EngineEvent, RunId, RunRejected, SessionGate};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Discards every event; for callers that only want the summary.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Fans one run out over every configured account and aggregates the outcomes.
pub struct ImportCoordinator {
    config: AccountConfig,
    fetcher: AccountFetcher,
    gate: SessionGate,
    busy: AtomicBool,
    next_run: AtomicU64,
}

impl ImportCoordinator {
    pub fn new(config: AccountConfig, fetcher: AccountFetcher, gate: SessionGate) -> Self {
        Self {
            config,
            fetcher,
            gate,
            busy: AtomicBool::new(false),
            next_run: AtomicU64::new(1),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Runs every account once and waits for all of them to settle.
    ///
    /// A second call while one is in flight is rejected without side effects.
    /// Otherwise the session is always marked as run, whatever the outcome.
    pub async fn run_all(&self, sink: &dyn ProgressSink) -> Result<ImportSummary, RunRejected> {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(RunRejected::AlreadyRunning)?;
        let run: RunId = self.next_run.fetch_add(1, Ordering::Relaxed);
        set_run_id(run);

        let summary = if self.config.is_empty() {
            importer_warn!("Run {}: no accounts configured", run);
            ImportSummary::empty()
        } else {
            let total = self.config.len();
            importer_info!("Run {}: importing {} accounts", run, total);
            sink.emit(EngineEvent::RunStarted { run, total });

            let fetcher = &self.fetcher;
            let pending = self.config.iter().map(|(account_id, slots)| async move {
                let outcome = fetcher.fetch(account_id, slots).await;
                sink.emit(EngineEvent::AccountSettled {
                    run,
                    outcome: outcome.clone(),
                });
                outcome
            });
            let outcomes = join_all(pending).await;
            ImportSummary::tally(total, &outcomes)
        };

        self.gate.mark_run();
        log_summary(run, &summary);
        sink.emit(EngineEvent::RunFinished { run, summary });
        Ok(summary)
    }
}

fn log_summary(run: RunId, summary: &ImportSummary) {
    match summary.classify() {
        RunClassification::ConfigEmpty => {}
        RunClassification::Success { total } => {
            importer_info!("Run {}: all {} accounts imported", run, total)
        }
        RunClassification::Error { successful, failed } => importer_warn!(
            "Run {}: {} succeeded, {} failed, {} skipped",
            run,
            successful,
            failed,
            summary.skipped
        ),
    }
    match summary.follow_up() {
        FollowUp::Reload { after } => {
            importer_info!("Run {}: reload scheduled in {:?}", run, after)
        }
        FollowUp::RevertToIdle { after } => {
            importer_info!("Run {}: nothing written, reverting in {:?}", run, after)
        }
    }
}

struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
