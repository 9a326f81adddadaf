// ABOUTME: Configurable cog for tests - registers fixed commands/hooks, then optionally fails
// ABOUTME: Buildable in code or from a manifest [config] table via the "static" catalog kind
//!
//! # Example
//!
//! ```no_run
//! use tux_loader::testing::StaticCog;
//! use tux_core::{Cog, Runtime};
//!
//! # async fn example() {
//! let cog = StaticCog::new()
//!     .command("first")
//!     .command("second")
//!     .fail_after(1, "boom");
//!
//! let mut runtime = Runtime::default();
//! let result = cog.setup(&mut runtime.handle("example")).await;
//! assert!(result.is_err());
//! // "first" stays registered: setup is not transactional
//! assert_eq!(runtime.commands().len(), 1);
//! # }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tux_core::{Cog, CommandContext, CommandHandler, Event, EventHook, EventKind, RuntimeHandle};

/// Behaviour of a [`StaticCog`], deserializable from manifest config
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticCogConfig {
    /// Command names to register, in order
    pub commands: Vec<String>,
    /// Number of `Ready` hooks to register after the commands
    pub hooks: usize,
    /// Fail setup with this message once `fail_after` commands are registered
    pub error: Option<String>,
    /// Panic with this message once `fail_after` commands are registered
    pub panic: Option<String>,
    /// Commands to register before failing or panicking
    pub fail_after: usize,
    /// Never finish setup
    pub hang: bool,
    /// Sleep before registering anything
    pub delay_ms: Option<u64>,
}

/// A cog whose setup does exactly what its config says
#[derive(Debug, Clone, Default)]
pub struct StaticCog {
    config: StaticCogConfig,
}

impl StaticCog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: StaticCogConfig) -> Self {
        Self { config }
    }

    /// Build from a manifest `[config]` value
    pub fn from_value(value: &Value) -> Result<Self> {
        let config = serde_json::from_value(value.clone()).context("Invalid static cog config")?;
        Ok(Self::from_config(config))
    }

    /// Catalog factory for the "static" kind
    pub fn factory() -> impl Fn(&Value) -> Result<Arc<dyn Cog>> + Send + Sync + 'static {
        |value| Ok(Arc::new(StaticCog::from_value(value)?) as Arc<dyn Cog>)
    }

    pub fn command(mut self, name: &str) -> Self {
        self.config.commands.push(name.to_string());
        self
    }

    pub fn hooks(mut self, count: usize) -> Self {
        self.config.hooks = count;
        self
    }

    /// Fail with `message` after registering `after` commands
    pub fn fail_after(mut self, after: usize, message: &str) -> Self {
        self.config.fail_after = after;
        self.config.error = Some(message.to_string());
        self
    }

    /// Panic with `message` after registering `after` commands
    pub fn panic_after(mut self, after: usize, message: &str) -> Self {
        self.config.fail_after = after;
        self.config.panic = Some(message.to_string());
        self
    }

    pub fn hang(mut self) -> Self {
        self.config.hang = true;
        self
    }

    pub fn delay(mut self, duration: Duration) -> Self {
        self.config.delay_ms = Some(duration.as_millis() as u64);
        self
    }

    fn fails(&self) -> bool {
        self.config.error.is_some() || self.config.panic.is_some()
    }

    fn trip(&self) -> Result<()> {
        if let Some(message) = &self.config.panic {
            panic!("{}", message);
        }
        if let Some(message) = &self.config.error {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }
}

#[async_trait]
impl Cog for StaticCog {
    fn name(&self) -> &str {
        "static"
    }

    async fn setup(&self, runtime: &mut RuntimeHandle<'_>) -> Result<()> {
        if let Some(ms) = self.config.delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.config.hang {
            std::future::pending::<()>().await;
        }

        for (registered, name) in self.config.commands.iter().enumerate() {
            if self.fails() && registered == self.config.fail_after {
                return self.trip();
            }
            let reply = format!("{} from {}", name, runtime.owner());
            runtime.register_command(name, "Static test command", StaticReply(reply))?;
        }
        if self.fails() {
            return self.trip();
        }

        for _ in 0..self.config.hooks {
            runtime.register_event_hook(EventKind::Ready, NoopHook);
        }
        Ok(())
    }
}

struct StaticReply(String);

#[async_trait]
impl CommandHandler for StaticReply {
    async fn handle(&self, _ctx: &CommandContext<'_>) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

struct NoopHook;

#[async_trait]
impl EventHook for NoopHook {
    async fn on_event(&self, _event: &Event) -> Result<()> {
        Ok(())
    }
}
