// ABOUTME: Command-line interface definition for the tux binary
// ABOUTME: Flags here override values from config.toml and the environment

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tux", version, about = "Chat automation agent assembled from loadable cogs")]
pub struct Cli {
    /// Config file to read instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding cog manifests
    #[arg(long, global = true, value_name = "DIR")]
    pub cogs: Option<PathBuf>,

    /// Keep full failure traces in the load report and log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Load cogs and serve the local console (default)
    Run,
    /// Load cogs, print the report and exit non-zero if any failed
    Check,
}

impl CliCommand {
    /// `check` writes the report to stdout itself; its logs go to the file
    pub fn logs_to_stdout(self) -> bool {
        self != CliCommand::Check
    }
}

impl Cli {
    pub fn command(&self) -> CliCommand {
        self.command.unwrap_or(CliCommand::Run)
    }

    /// Apply flag overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.cogs {
            config.cogs.root = root.clone();
        }
        if self.debug {
            config.bot.debug = true;
        }
    }
}
