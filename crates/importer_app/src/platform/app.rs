use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use importer_core::{update, AppState, ControlState, Msg};
use importer_engine::{
    AccountFetcher, EngineHandle, FileSessionStore, FileSlotStore, ImportCoordinator,
    ReqwestSource, SessionGate,
};
use importer_logging::{importer_info, importer_warn};

use super::cli::Cli;
use super::config;
use super::effects::{EffectRunner, LoopEvent};
use super::logging;
use super::ui;

pub fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log.into());

    let config = config::load(&cli.config)?;
    let gate = SessionGate::new(Arc::new(FileSessionStore::new(config.session_dir.clone())));
    if cli.new_session {
        gate.reset().context("failed to clear the session marker")?;
        importer_info!("Started a new session");
    }

    let source = ReqwestSource::new(config.fetch.clone()).context("invalid fetch settings")?;
    let store = Arc::new(FileSlotStore::new(config.storage_dir.clone()));
    let fetcher = AccountFetcher::new(Arc::new(source), store);
    let coordinator = ImportCoordinator::new(config.accounts, fetcher, gate.clone());

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(EngineHandle::new(coordinator), loop_tx.clone());
    if !cli.once {
        spawn_trigger_reader(loop_tx);
        println!("{}", ui::render::usage_hint());
    }

    let mut app = App::new(runner, gate, cli.once);
    app.page_ready();
    while let Ok(event) = loop_rx.recv() {
        if !app.handle_event(event) {
            break;
        }
    }
    Ok(())
}

/// Each line on stdin activates the control; `q` quits.
/// Once stdin closes there are simply no more manual triggers.
fn spawn_trigger_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                return;
            };
            let event = if matches!(line.trim(), "q" | "quit") {
                LoopEvent::Quit
            } else {
                LoopEvent::Msg(Msg::TriggerActivated)
            };
            let quit = event == LoopEvent::Quit;
            if loop_tx.send(event).is_err() || quit {
                return;
            }
        }
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
    gate: SessionGate,
    once: bool,
}

impl App {
    fn new(runner: EffectRunner, gate: SessionGate, once: bool) -> Self {
        Self {
            state: AppState::new(),
            runner,
            gate,
            once,
        }
    }

    /// Fresh in-memory state, then the session-gated automatic run.
    fn page_ready(&mut self) {
        self.state = AppState::new();

        let auto_run = self.gate.should_auto_run();
        if auto_run {
            importer_info!("New session detected, starting automatic import");
        } else {
            importer_info!("Session already imported, skipping automatic import");
        }
        self.dispatch_msg(Msg::PageReady { auto_run });

        if !auto_run {
            // Nothing changed, but the idle control still has to appear once.
            self.render();
            if self.once {
                self.dispatch_msg(Msg::TriggerActivated);
            }
        }
    }

    /// Returns false when the loop should stop.
    fn handle_event(&mut self, event: LoopEvent) -> bool {
        match event {
            LoopEvent::Msg(msg) => {
                let reverting = matches!(msg, Msg::RevertElapsed { .. });
                self.dispatch_msg(msg);
                !(self.once && reverting && self.state.control() == ControlState::Idle)
            }
            LoopEvent::Reload => {
                importer_info!("Reloading");
                self.runner.abandon();
                if self.once {
                    return false;
                }
                self.page_ready();
                true
            }
            LoopEvent::Quit => false,
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        if msg == Msg::RunRejected {
            importer_warn!("Import already in progress, trigger ignored");
        }
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            self.render();
        }
        self.runner.enqueue(effects);
    }

    fn render(&self) {
        println!(
            "{} {}",
            Local::now().format("%H:%M:%S"),
            ui::render::render(&self.state.view())
        );
    }
}
