use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use importer_core::{Effect, FetchOutcome, Msg};
use importer_engine::{EngineEvent, EngineHandle};
use importer_logging::{importer_debug, importer_info, importer_warn};

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Msg(Msg),
    /// A scheduled reload is due.
    Reload,
    Quit,
}

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    loop_tx: mpsc::Sender<LoopEvent>,
    /// Bumped on reload; timers armed under an older value stay silent.
    timer_epoch: Arc<AtomicU64>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, loop_tx: mpsc::Sender<LoopEvent>) -> Self {
        let runner = Self {
            engine: Arc::new(engine),
            loop_tx,
            timer_epoch: Arc::new(AtomicU64::new(0)),
        };
        runner.spawn_event_loop();
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartRun { delay } => {
                    importer_debug!("StartRun delay={:?}", delay);
                    self.engine.run_all(delay);
                }
                Effect::ScheduleReload { after } => {
                    importer_info!("Reloading in {:?}", after);
                    self.schedule(after, LoopEvent::Reload);
                }
                Effect::ScheduleRevert { generation, after } => {
                    self.schedule(after, LoopEvent::Msg(Msg::RevertElapsed { generation }));
                }
            }
        }
    }

    /// Drops everything the previous page had in flight: engine runs, their
    /// pending events and every armed timer.
    pub fn abandon(&self) {
        self.timer_epoch.fetch_add(1, Ordering::AcqRel);
        self.engine.abandon();
    }

    fn schedule(&self, after: Duration, event: LoopEvent) {
        let loop_tx = self.loop_tx.clone();
        let timer_epoch = self.timer_epoch.clone();
        let armed = timer_epoch.load(Ordering::Acquire);
        thread::spawn(move || {
            thread::sleep(after);
            if timer_epoch.load(Ordering::Acquire) == armed {
                let _ = loop_tx.send(event);
            } else {
                importer_debug!("Timer from a previous page ignored");
            }
        });
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let loop_tx = self.loop_tx.clone();
        thread::spawn(move || {
            while let Some(event) = engine.recv() {
                let Some(msg) = map_event(event) else {
                    continue;
                };
                if loop_tx.send(LoopEvent::Msg(msg)).is_err() {
                    break;
                }
            }
        });
    }
}

/// Translates engine events into core messages. Per-account settlements are
/// reported here and do not reach the state machine.
fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::RunStarted { total, .. } => Some(Msg::RunStarted { total }),
        EngineEvent::AccountSettled { run, outcome } => {
            match &outcome {
                FetchOutcome::Success { account_id } => {
                    importer_info!("Run {}: account {} imported", run, account_id)
                }
                FetchOutcome::Skipped { account_id } => {
                    importer_info!("Run {}: account {} skipped (no slots)", run, account_id)
                }
                FetchOutcome::Failure {
                    account_id,
                    kind,
                    detail,
                } => importer_warn!(
                    "Run {}: account {} failed: {} ({})",
                    run,
                    account_id,
                    kind,
                    detail
                ),
            }
            None
        }
        EngineEvent::RunFinished { summary, .. } => Some(Msg::RunFinished(summary)),
        EngineEvent::RunRejected => Some(Msg::RunRejected),
    }
}
