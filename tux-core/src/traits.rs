// ABOUTME: Core traits that cogs, command handlers and event hooks implement
// ABOUTME: The loader only ever sees a cog through the Cog trait

use crate::commands::Command;
use crate::runtime::{Runtime, RuntimeHandle};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// =============================================================================
// Cogs
// =============================================================================

/// An independently loadable unit contributing commands and event hooks.
///
/// `setup` receives a [`RuntimeHandle`] scoped to the cog being loaded; every
/// registration made through it is tagged with that cog as owner. Registrations
/// are not rolled back if `setup` fails partway through.
#[async_trait]
pub trait Cog: Send + Sync {
    /// Cog kind name for logging
    fn name(&self) -> &str;

    /// Register this cog's capabilities against the runtime
    async fn setup(&self, runtime: &mut RuntimeHandle<'_>) -> Result<()>;

    /// Called before the cog's registrations are removed on unload
    async fn teardown(&self, _runtime: &mut RuntimeHandle<'_>) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Everything a command handler gets to look at while running
pub struct CommandContext<'a> {
    /// Read-only view of the runtime (registered commands, settings)
    pub runtime: &'a Runtime,
    /// The parsed command being invoked
    pub command: &'a Command,
    /// Identity of whoever sent the command
    pub author: &'a str,
    /// When the triggering message was received
    pub received_at: DateTime<Utc>,
}

/// Handler for a single registered command
///
/// # Returns
/// * `Ok(Some(reply))` - Command handled, reply should be sent
/// * `Ok(None)` - Command handled, nothing to send
/// * `Err(error)` - Command handling failed
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext<'_>) -> Result<Option<String>>;
}

// =============================================================================
// Events
// =============================================================================

/// Kinds of runtime events a hook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The agent finished loading and is ready to serve
    Ready,
    /// Any incoming message, command or not
    Message,
    /// A command handler returned an error
    CommandError,
}

/// A runtime event delivered to hooks
#[derive(Debug, Clone)]
pub enum Event {
    Ready,
    Message { author: String, body: String },
    CommandError { command: String, error: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready => EventKind::Ready,
            Event::Message { .. } => EventKind::Message,
            Event::CommandError { .. } => EventKind::CommandError,
        }
    }
}

/// Hook invoked for every event of the kind it was registered for
#[async_trait]
pub trait EventHook: Send + Sync {
    async fn on_event(&self, event: &Event) -> Result<()>;
}
