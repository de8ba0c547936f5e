//! fxbridge - file-based request/response bridge to an external execution process
//!
//! The UI side writes a currency pair to a query-request artifact, waits for
//! the execution process to drop a CSV price history next to it, and writes
//! trade orders to a third artifact. Nothing but the shared directory
//! connects the two processes.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use fxbridge::models::BridgeConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let bridge = fxbridge::start(&BridgeConfig::default()).await?;
//! let history = bridge
//!     .coordinator
//!     .fetch_history("EURUSD", &CancellationToken::new())
//!     .await?;
//! println!("{}", history.summary());
//! # Ok(())
//! # }
//! ```

pub use fxbridge_core as bridge;
pub use fxbridge_models as models;

pub mod session;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use fxbridge_core::{sanitize, ArtifactPaths, BridgeError, Coordinator, Submitter};
use fxbridge_models::config::BridgeConfig;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/fxbridge.toml";

/// The three protocol components wired to one artifact directory.
pub struct Bridge {
    pub paths: ArtifactPaths,
    pub coordinator: Arc<Coordinator>,
    pub submitter: Submitter,
}

/// Build the bridge components from configuration without touching the directory.
pub fn build_bridge(config: &BridgeConfig) -> Result<Bridge, anyhow::Error> {
    if config.polling.interval_ms == 0 {
        return Err(
            BridgeError::Config("polling.interval_ms must be greater than zero".into()).into(),
        );
    }
    let dir = Path::new(&config.artifacts.dir);
    if !dir.is_dir() {
        return Err(BridgeError::Config(format!(
            "artifact directory does not exist: {}",
            dir.display()
        ))
        .into());
    }

    let paths = ArtifactPaths::from_config(&config.artifacts);
    Ok(Bridge {
        coordinator: Arc::new(Coordinator::new(paths.clone(), &config.polling)),
        submitter: Submitter::new(paths.trade_order.clone()),
        paths,
    })
}

/// Build the bridge and run the startup sweep. Call once per process,
/// before handling any requests.
pub async fn start(config: &BridgeConfig) -> Result<Bridge, anyhow::Error> {
    let bridge = build_bridge(config)?;
    let report = sanitize(&bridge.paths).await;
    tracing::info!(
        removed = report.removed.len(),
        skipped = report.skipped.len(),
        "Startup sweep complete"
    );
    Ok(bridge)
}

/// Load configuration. An explicit path must exist; without one the default
/// path is tried and built-in defaults are used if it is missing.
pub fn load_config(path: Option<&str>) -> Result<BridgeConfig, anyhow::Error> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (DEFAULT_CONFIG_PATH, false),
    };

    if !required && !Path::new(path).exists() {
        tracing::debug!(path, "No config file, using defaults");
        return Ok(BridgeConfig::default());
    }

    let config_str = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {path}"))
}
