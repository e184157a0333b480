//! Check command implementation

use crate::config::Config;
use crate::scheduler::NOTHING_IN_PROGRESS;
use crate::source::{DataSource, SfgClient};
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Also list matches outside the relevance window
    #[arg(short, long)]
    pub all: bool,
}

impl CheckArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let source = SfgClient::with_config(config.source.sfg())?;
        let records = source.get_current().await?;
        let total = records.len();

        let mut shown: Vec<_> = if self.all {
            records
        } else {
            let filter = config.source.relevance_filter();
            records
                .into_iter()
                .filter(|r| filter.is_relevant(r, Utc::now()))
                .collect()
        };
        shown.sort_by(|a, b| a.id.cmp(&b.id));

        tracing::info!(total, shown = shown.len(), "Fetched matches");

        if shown.is_empty() {
            println!("{}", NOTHING_IN_PROGRESS);
        }
        for record in shown {
            println!("[{}] {:?}\n{}\n", record.id, record.status, record.summary());
        }

        Ok(())
    }
}
