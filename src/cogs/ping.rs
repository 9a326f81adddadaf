// ABOUTME: Ping cog - replies with latency, uptime and process CPU/RAM usage
// ABOUTME: The reply text is configurable through the manifest [config] table

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Mutex;
use sysinfo::{Pid, System};
use tux_core::{Cog, CommandContext, CommandHandler, RuntimeHandle};

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PingConfig {
    /// Text the reply starts with
    pub reply: String,
    /// Command name to register under
    pub command: String,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            reply: "Pong!".to_string(),
            command: "ping".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PingCog {
    config: PingConfig,
}

impl PingCog {
    pub fn new(config: PingConfig) -> Self {
        Self { config }
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let config = serde_json::from_value(value.clone()).context("Invalid ping cog config")?;
        Ok(Self::new(config))
    }
}

#[async_trait]
impl Cog for PingCog {
    fn name(&self) -> &str {
        "ping"
    }

    async fn setup(&self, runtime: &mut RuntimeHandle<'_>) -> Result<()> {
        runtime.register_command(
            &self.config.command,
            "Check the agent's latency and uptime",
            PingCommand {
                reply: self.config.reply.clone(),
                system: Mutex::new(System::new()),
            },
        )?;
        Ok(())
    }
}

struct PingCommand {
    reply: String,
    // Kept between calls: CPU usage is measured against the previous refresh
    system: Mutex<System>,
}

/// Resource usage of the agent process and the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemStats {
    pub process_cpu: f32,
    pub process_ram_mb: u64,
    pub used_ram_mb: u64,
    pub total_ram_mb: u64,
}

impl SystemStats {
    fn sample(system: &mut System) -> Option<Self> {
        let pid: Pid = sysinfo::get_current_pid().ok()?;
        system.refresh_memory();
        system.refresh_process(pid);
        let process = system.process(pid)?;
        Some(Self {
            process_cpu: process.cpu_usage(),
            process_ram_mb: process.memory() / 1_000_000,
            used_ram_mb: (system.used_memory() + system.used_swap()) / 1_000_000,
            total_ram_mb: (system.total_memory() + system.total_swap()) / 1_000_000,
        })
    }
}

impl PingCommand {
    fn system_stats(&self) -> Option<SystemStats> {
        match self.system.lock() {
            Ok(mut system) => SystemStats::sample(&mut system),
            Err(_) => None,
        }
    }
}

#[async_trait]
impl CommandHandler for PingCommand {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Option<String>> {
        let now = Utc::now();
        let latency_ms = (now - ctx.received_at).num_milliseconds().max(0);
        let uptime = format_uptime(ctx.runtime.started_at(), now);

        let mut reply = format!(
            "{} latency {}ms, uptime {}, {} commands loaded",
            self.reply,
            latency_ms,
            uptime,
            ctx.runtime.commands().len()
        );
        match self.system_stats() {
            Some(stats) => {
                reply.push_str(", ");
                reply.push_str(&format_usage(&stats));
            }
            None => tracing::debug!("Process stats unavailable"),
        }
        Ok(Some(reply))
    }
}

/// "CPU 1.5%, RAM 42 MB (3000/16000 MB in use)"
pub fn format_usage(stats: &SystemStats) -> String {
    format!(
        "CPU {:.1}%, RAM {} MB ({}/{} MB in use)",
        stats.process_cpu, stats.process_ram_mb, stats.used_ram_mb, stats.total_ram_mb
    )
}

/// "1d 2h 3m 4s", dropping leading zero units
pub fn format_uptime(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total = (now - started_at).num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        (total % 86_400) / 3_600,
        (total % 3_600) / 60,
        total % 60,
    );

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_uptime() {
        let start = Utc::now();
        assert_eq!(format_uptime(start, start), "0s");
        assert_eq!(format_uptime(start, start + Duration::seconds(75)), "1m 15s");
        assert_eq!(
            format_uptime(start, start + Duration::seconds(90_061)),
            "1d 1h 1m 1s"
        );
        assert_eq!(format_uptime(start, start - Duration::seconds(5)), "0s");
    }

    #[test]
    fn test_format_usage() {
        let stats = SystemStats {
            process_cpu: 1.5,
            process_ram_mb: 42,
            used_ram_mb: 3_000,
            total_ram_mb: 16_000,
        };
        assert_eq!(
            format_usage(&stats),
            "CPU 1.5%, RAM 42 MB (3000/16000 MB in use)"
        );
    }

    #[test]
    fn test_sample_reads_own_process() {
        let stats = SystemStats::sample(&mut System::new()).unwrap();
        assert!(stats.process_ram_mb <= stats.total_ram_mb);
        assert!(stats.total_ram_mb > 0);
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let cog = PingCog::from_value(&serde_json::json!({})).unwrap();
        assert_eq!(cog.config.reply, "Pong!");

        let cog = PingCog::from_value(&serde_json::json!({"reply": "Here!"})).unwrap();
        assert_eq!(cog.config.reply, "Here!");
        assert_eq!(cog.config.command, "ping");

        assert!(PingCog::from_value(&serde_json::json!({"replly": "x"})).is_err());
    }
}
