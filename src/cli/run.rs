//! Run command implementation

use super::build_notifier;
use crate::config::Config;
use crate::scheduler::{PollingScheduler, SchedulerConfig};
use crate::source::SfgClient;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the polling interval (seconds)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut scheduler_config = SchedulerConfig::from(&config.scheduler);
        if let Some(secs) = self.interval {
            anyhow::ensure!(secs > 0, "--interval must be positive");
            scheduler_config.polling_interval = Duration::from_secs(secs);
        }

        let source = SfgClient::with_config(config.source.sfg())?;
        let notifier = build_notifier(config)?;

        tracing::info!(
            url = %source.url(),
            notifier = ?config.notifier.kind,
            "Watching matches"
        );

        let mut scheduler = PollingScheduler::new(
            scheduler_config,
            Arc::new(source),
            notifier,
            config.source.relevance_filter(),
        )
        .with_policy(config.highlights);

        scheduler.run().await;
        Ok(())
    }
}
