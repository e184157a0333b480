//! CLI interface for kickoff
//!
//! Provides subcommands for:
//! - `run`: Poll the match feed and post highlights
//! - `check`: Fetch once and print what is being played
//! - `config`: Show the effective configuration

mod check;
mod run;

pub use check::CheckArgs;
pub use run::RunArgs;

use crate::config::{Config, NotifierKind};
use crate::notify::{Notifier, SlackNotifier, StdoutNotifier};
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "kickoff")]
#[command(about = "Live football match highlights bot")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the match feed and post highlights
    Run(RunArgs),
    /// Fetch once and print the matches being played
    Check(CheckArgs),
    /// Show the effective configuration
    Config,
}

/// Build the notification sink selected in the configuration
pub fn build_notifier(config: &Config) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.notifier.kind {
        NotifierKind::Stdout => Ok(Arc::new(StdoutNotifier)),
        NotifierKind::Slack => {
            let slack = config
                .notifier
                .slack()
                .ok_or_else(|| anyhow::anyhow!("Slack notifier needs a token and a channel"))?;
            Ok(Arc::new(SlackNotifier::new(slack)?))
        }
    }
}
