use clap::Parser;
use kickoff::cli::{Cli, Commands};
use kickoff::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; only a missing file falls back to the bundled defaults
    if !std::path::Path::new(&cli.config).exists() {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
    }
    let config = Config::load_or_default(&cli.config)?;

    // Initialize telemetry
    kickoff::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting highlights bot");
            args.execute(&config).await?;
        }
        Commands::Check(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Source: {}", config.source.url);
            println!(
                "  Relevance window: {}s (assumed match length {}m)",
                config.source.relevance_threshold_secs, config.source.assumed_duration_mins
            );
            println!(
                "  Polling: every {}s, backoff ratio {}, max {}s",
                config.scheduler.polling_interval_secs,
                config.scheduler.backoff_ratio,
                config.scheduler.max_interval_secs
            );
            println!(
                "  Highlights: score changes={}, second yellow as red={}",
                config.highlights.report_score_changes, config.highlights.second_yellow_is_red
            );
            println!("  Notifier: {:?}", config.notifier.kind);
        }
    }

    Ok(())
}
