// ABOUTME: Help cog - lists registered commands or describes one of them
// ABOUTME: Can group the listing by the cog that registered each command

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tux_core::{Cog, CommandContext, CommandHandler, Runtime, RuntimeHandle};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HelpConfig {
    /// List commands under the cog that registered them
    pub group_by_owner: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HelpCog {
    config: HelpConfig,
}

impl HelpCog {
    pub fn new(config: HelpConfig) -> Self {
        Self { config }
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let config = serde_json::from_value(value.clone()).context("Invalid help cog config")?;
        Ok(Self::new(config))
    }
}

#[async_trait]
impl Cog for HelpCog {
    fn name(&self) -> &str {
        "help"
    }

    async fn setup(&self, runtime: &mut RuntimeHandle<'_>) -> Result<()> {
        runtime.register_command(
            "help",
            "List commands, or describe one: help <command>",
            HelpCommand {
                group_by_owner: self.config.group_by_owner,
            },
        )?;
        Ok(())
    }
}

struct HelpCommand {
    group_by_owner: bool,
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Option<String>> {
        let prefix = &ctx.runtime.settings().prefix;

        if let Some(name) = ctx.command.first_arg() {
            let name = name.trim_start_matches(prefix.as_str());
            let reply = match ctx.runtime.commands().get(name) {
                Some(cmd) => format!("{}{} - {} ({})", prefix, cmd.name, cmd.description, cmd.owner),
                None => format!("Unknown command: {}{}", prefix, name),
            };
            return Ok(Some(reply));
        }

        Ok(Some(if self.group_by_owner {
            grouped_listing(ctx.runtime, prefix)
        } else {
            flat_listing(ctx.runtime, prefix)
        }))
    }
}

fn flat_listing(runtime: &Runtime, prefix: &str) -> String {
    let mut lines = vec!["Commands:".to_string()];
    for cmd in runtime.commands().iter() {
        lines.push(format!("  {}{} - {}", prefix, cmd.name, cmd.description));
    }
    lines.join("\n")
}

fn grouped_listing(runtime: &Runtime, prefix: &str) -> String {
    let mut groups: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for cmd in runtime.commands().iter() {
        groups
            .entry(cmd.owner.as_str())
            .or_default()
            .push(format!("    {}{} - {}", prefix, cmd.name, cmd.description));
    }

    let mut lines = vec!["Commands:".to_string()];
    for (owner, commands) in groups {
        lines.push(format!("  {}:", owner));
        lines.extend(commands);
    }
    lines.join("\n")
}
