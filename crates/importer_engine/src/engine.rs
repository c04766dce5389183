use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use importer_logging::{importer_debug, importer_warn};
use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinHandle;

use crate::{EngineEvent, ImportCoordinator, ProgressSink};

enum EngineCommand {
    RunAll { delay: Duration, epoch: u64 },
    Abandon,
}

/// Events tagged with the epoch of the run that produced them.
type Tagged = (u64, EngineEvent);

struct ChannelProgressSink {
    epoch: u64,
    tx: mpsc::Sender<Tagged>,
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send((self.epoch, event));
    }
}

/// Owns the engine thread. Every run executes on that thread's single-threaded
/// runtime, so all account requests of a run share one cooperative scheduler.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<Tagged>>,
    epoch: Arc<AtomicU64>,
}

impl EngineHandle {
    pub fn new(coordinator: ImportCoordinator) -> Self {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let coordinator = Arc::new(coordinator);
        let epoch = Arc::new(AtomicU64::new(0));

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");
            runtime.block_on(async move {
                let mut in_flight: Vec<JoinHandle<()>> = Vec::new();
                while let Some(command) = cmd_rx.recv().await {
                    in_flight.retain(|task| !task.is_finished());
                    match command {
                        EngineCommand::Abandon => {
                            importer_debug!("Abandoning {} in-flight run(s)", in_flight.len());
                            for task in in_flight.drain(..) {
                                task.abort();
                            }
                        }
                        EngineCommand::RunAll { delay, epoch } => {
                            let coordinator = coordinator.clone();
                            let sink = ChannelProgressSink {
                                epoch,
                                tx: event_tx.clone(),
                            };
                            in_flight.push(tokio::spawn(async move {
                                run_after(coordinator.as_ref(), delay, sink).await;
                            }));
                        }
                    }
                }
            });
        });

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            epoch,
        }
    }

    /// Requests a run after `delay`. Overlapping requests are answered with
    /// `EngineEvent::RunRejected`.
    pub fn run_all(&self, delay: Duration) {
        let epoch = self.epoch.load(Ordering::Acquire);
        let _ = self.cmd_tx.send(EngineCommand::RunAll { delay, epoch });
    }

    /// Cancels every requested or running import. Once this returns, no event
    /// from those runs is delivered; slot writes stop at the next suspension point.
    pub fn abandon(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        let _ = self.cmd_tx.send(EngineCommand::Abandon);
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        let deadline = Instant::now() + timeout;
        let rx = self.event_rx.lock().ok()?;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (epoch, event) = rx.recv_timeout(remaining).ok()?;
            if self.is_current(epoch) {
                return Some(event);
            }
        }
    }

    /// Blocks until the next event. `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        let rx = self.event_rx.lock().ok()?;
        loop {
            let (epoch, event) = rx.recv().ok()?;
            if self.is_current(epoch) {
                return Some(event);
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        let current = epoch == self.epoch.load(Ordering::Acquire);
        if !current {
            importer_debug!("Dropping event from abandoned epoch {}", epoch);
        }
        current
    }
}

async fn run_after(coordinator: &ImportCoordinator, delay: Duration, sink: ChannelProgressSink) {
    if !delay.is_zero() {
        importer_debug!("Run requested, starting in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
    if let Err(err) = coordinator.run_all(&sink).await {
        importer_warn!("Run request ignored: {}", err);
        sink.emit(EngineEvent::RunRejected);
    }
}
