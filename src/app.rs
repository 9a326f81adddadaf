// ABOUTME: Startup wiring shared by the run and check commands
// ABOUTME: Builds the runtime and loader from config and performs the initial load pass

use crate::cogs::builtin_catalog;
use crate::config::Config;
use anyhow::{Context, Result};
use std::sync::Arc;
use tux_core::Runtime;
use tux_loader::{CogLoader, LoadReport, Reporter};

/// Everything the agent needs after the initial load
pub struct Started {
    pub runtime: Runtime,
    pub loader: CogLoader,
    pub report: LoadReport,
}

pub fn build_loader(config: &Config) -> CogLoader {
    CogLoader::new(&config.cogs.root, Arc::new(builtin_catalog()))
        .with_options(config.load_options())
}

/// Create the runtime and load every cog under the configured root.
///
/// Fails only when the cog root can't be enumerated or is empty; individual
/// cog failures are in the returned report.
pub async fn start(config: &Config, reporter: &dyn Reporter) -> Result<Started> {
    let mut runtime = Runtime::new(config.runtime_settings());
    let mut loader = build_loader(config);

    tracing::info!(
        root = %config.cogs.root.display(),
        debug = config.bot.debug,
        timeout_secs = ?config.cogs.setup_timeout_secs,
        "Loading cogs"
    );

    let report = loader
        .initialize(&mut runtime, reporter)
        .await
        .with_context(|| format!("Failed to load cogs from {}", config.cogs.root.display()))?;

    Ok(Started {
        runtime,
        loader,
        report,
    })
}
