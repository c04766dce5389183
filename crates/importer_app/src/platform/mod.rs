//! Host side of the importer: CLI, config, terminal control, effect execution.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod ui;

pub use app::run_app;
