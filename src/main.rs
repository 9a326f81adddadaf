// ABOUTME: Main entry point for the tux agent
// ABOUTME: Initializes config and logging, loads cogs, then runs the console or reports and exits

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tux::cli::{Cli, CliCommand};
use tux::config::Config;
use tux::console::Console;
use tux::{app, logging, paths};
use tux_core::Event;
use tux_loader::{FanoutReporter, TracingReporter, WriterReporter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(Some(path))?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    let command = cli.command();
    let _log_guard =
        logging::init(&paths::log_dir(), config.bot.debug, command.logs_to_stdout())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting tux");

    match command {
        CliCommand::Check => check(&config).await,
        CliCommand::Run => run(&config).await,
    }
}

async fn check(config: &Config) -> Result<ExitCode> {
    // Tracing goes only to the log file here, so stdout gets one copy
    let reporter = FanoutReporter::new()
        .with(TracingReporter)
        .with(WriterReporter::new(std::io::stdout()));
    let started = app::start(config, &reporter).await?;

    Ok(if started.report.all_loaded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(config: &Config) -> Result<ExitCode> {
    let started = app::start(config, &TracingReporter).await?;

    let hooks = started.runtime.emit(&Event::Ready).await;
    tracing::info!(
        commands = started.runtime.commands().len(),
        ready_hooks = hooks,
        prefix = %config.bot.prefix,
        "Ready - type commands on stdin"
    );

    let mut console = Console::new(started.runtime, started.loader);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    tokio::select! {
        result = console.run(stdin, tokio::io::stdout()) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted, shutting down"),
    }
    Ok(ExitCode::SUCCESS)
}
