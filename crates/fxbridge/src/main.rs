use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use fxbridge::bridge::{sanitize, ArtifactPaths};
use fxbridge::models::BridgeConfig;
use fxbridge::session::{Session, HELP};

#[derive(Parser, Debug)]
#[command(
    name = "fxbridge",
    about = "File-based bridge to an external FX execution process - requests price history and writes trade orders through a shared directory"
)]
struct Cli {
    /// Path to configuration file [default: config/fxbridge.toml if present]
    #[arg(short, long)]
    config: Option<String>,

    /// Directory shared with the execution process (overrides config)
    #[arg(short, long)]
    dir: Option<String>,

    /// Milliseconds between checks for the query result (overrides config)
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Seconds to wait for a query result, 0 to wait forever (overrides config)
    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove leftover artifacts and exit
    Clean,
}

impl Cli {
    fn apply_overrides(&self, config: &mut BridgeConfig) {
        if let Some(dir) = &self.dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(interval) = self.poll_interval_ms {
            config.polling.interval_ms = interval;
        }
        if let Some(timeout) = self.timeout_secs {
            config.polling.timeout_seconds = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = fxbridge::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    if let Some(Command::Clean) = cli.command {
        let report = sanitize(&ArtifactPaths::from_config(&config.artifacts)).await;
        tracing::info!(removed = report.removed.len(), "Clean complete");
        return Ok(());
    }

    let bridge = fxbridge::start(&config)
        .await
        .context("Failed to start bridge")?;

    let shutdown = CancellationToken::new();

    // Handle shutdown signals
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal");
            shutdown.cancel();
        });
    }

    println!("{HELP}");
    let session = Session::new(bridge.coordinator.clone(), bridge.submitter.clone());
    session
        .run(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            shutdown,
        )
        .await
        .context("Console session failed")?;

    Ok(())
}
