use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod inspect;
mod process;

#[derive(Debug, Parser)]
#[command(name = "venuescope")]
#[command(about = "Venue mention detection and sentiment scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the mention pipeline over a JSON batch of posts
    Process {
        /// JSON array of posts (with nested comments)
        #[arg(long)]
        input: PathBuf,

        /// Write mentions and the quality report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of shards to split the batch into (defaults to
        /// VENUESCOPE_MAX_CONCURRENT_SHARDS)
        #[arg(long)]
        shards: Option<usize>,
    },
    /// Score a single piece of text and show what it mentions
    Analyze {
        /// Text to analyze
        text: String,
    },
    /// List the configured venues
    Venues,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = venuescope_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, venues_path = %config.venues_path.display(), "config loaded");

    match cli.command {
        Commands::Process {
            input,
            output,
            shards,
        } => process::run_process(&config, &input, output.as_deref(), shards).await?,
        Commands::Analyze { text } => inspect::run_analyze(&config, &text)?,
        Commands::Venues => inspect::run_venues(&config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
