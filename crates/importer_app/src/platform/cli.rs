use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "inventory-importer",
    version,
    about = "Import per-account inventories into local storage slots"
)]
pub struct Cli {
    /// Path to the RON config file.
    #[arg(long, default_value = "importer.ron")]
    pub config: PathBuf,

    /// Clear the session marker first, so page-ready imports automatically again.
    #[arg(long)]
    pub new_session: bool,

    /// Run one import (automatic or forced), wait for its follow-up, then exit.
    #[arg(long)]
    pub once: bool,

    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}
