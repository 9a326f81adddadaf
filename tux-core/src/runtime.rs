// ABOUTME: The shared runtime registry that cogs register against
// ABOUTME: Runtime owns registries and attached cogs; RuntimeHandle is the per-cog view used during setup

use crate::commands::{Command, DEFAULT_PREFIX};
use crate::registry::{CommandRegistry, HookRegistry, RegisteredCommand, RegistryError};
use crate::traits::{Cog, CommandContext, CommandHandler, Event, EventHook, EventKind};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Process-level settings visible to every cog
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Command prefix (e.g., ">")
    pub prefix: String,
    /// Whether debug mode is enabled globally
    pub debug: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            debug: false,
        }
    }
}

/// Result of dispatching a command
#[derive(Debug)]
pub enum DispatchResult {
    /// Handler ran; optional reply to send back
    Handled(Option<String>),
    /// No command with that name is registered
    Unknown(String),
    /// Handler returned an error
    Failed(anyhow::Error),
}

/// Owned registry of everything the loaded cogs contributed.
///
/// Lives for the whole process. Written during load passes (and explicit
/// unload/reload), read during command dispatch.
pub struct Runtime {
    settings: RuntimeSettings,
    commands: CommandRegistry,
    hooks: HookRegistry,
    cogs: Vec<(String, Arc<dyn Cog>)>,
    started_at: DateTime<Utc>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(RuntimeSettings::default())
    }
}

impl Runtime {
    pub fn new(settings: RuntimeSettings) -> Self {
        Self {
            settings,
            commands: CommandRegistry::new(),
            hooks: HookRegistry::new(),
            cogs: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Total number of registered commands and hooks
    pub fn capability_count(&self) -> usize {
        self.commands.len() + self.hooks.len()
    }

    /// Create a registration view scoped to `owner`
    pub fn handle(&mut self, owner: &str) -> RuntimeHandle<'_> {
        RuntimeHandle {
            runtime: self,
            owner: owner.to_string(),
        }
    }

    /// Commands registered by a given cog, in registration order
    pub fn commands_owned_by(&self, owner: &str) -> Vec<&RegisteredCommand> {
        self.commands.iter().filter(|c| c.owner == owner).collect()
    }

    // -------------------------------------------------------------------------
    // Attached cogs
    // -------------------------------------------------------------------------

    /// Record a cog as loaded under `name`
    pub fn attach(&mut self, name: &str, cog: Arc<dyn Cog>) -> Result<(), RegistryError> {
        if self.is_attached(name) {
            return Err(RegistryError::CogAlreadyAttached(name.to_string()));
        }
        self.cogs.push((name.to_string(), cog));
        Ok(())
    }

    /// Forget a loaded cog without touching its registrations
    pub fn detach(&mut self, name: &str) -> Option<Arc<dyn Cog>> {
        let index = self.cogs.iter().position(|(n, _)| n == name)?;
        Some(self.cogs.remove(index).1)
    }

    pub fn is_attached(&self, name: &str) -> bool {
        self.cogs.iter().any(|(n, _)| n == name)
    }

    /// Names of attached cogs in load order
    pub fn attached(&self) -> impl Iterator<Item = &str> {
        self.cogs.iter().map(|(n, _)| n.as_str())
    }

    /// Remove all commands and hooks owned by `owner`.
    /// Returns (commands removed, hooks removed).
    pub fn remove_owner(&mut self, owner: &str) -> (usize, usize) {
        (
            self.commands.remove_owner(owner),
            self.hooks.remove_owner(owner),
        )
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Run the handler registered for `command`
    pub async fn dispatch(
        &self,
        command: &Command,
        author: &str,
        received_at: DateTime<Utc>,
    ) -> DispatchResult {
        let Some(registered) = self.commands.get(&command.name) else {
            return DispatchResult::Unknown(command.name.clone());
        };
        let handler = Arc::clone(&registered.handler);

        let ctx = CommandContext {
            runtime: self,
            command,
            author,
            received_at,
        };

        match handler.handle(&ctx).await {
            Ok(reply) => DispatchResult::Handled(reply),
            Err(e) => {
                tracing::warn!(
                    command = %command.name,
                    owner = %registered.owner,
                    error = %e,
                    "Command handler failed"
                );
                self.emit(&Event::CommandError {
                    command: command.name.clone(),
                    error: e.to_string(),
                })
                .await;
                DispatchResult::Failed(e)
            }
        }
    }

    /// Deliver an event to every hook registered for its kind.
    /// Hook errors are logged and do not stop later hooks. Returns hooks run.
    pub async fn emit(&self, event: &Event) -> usize {
        let mut ran = 0;
        for registered in self.hooks.for_event(event.kind()) {
            ran += 1;
            if let Err(e) = registered.hook.on_event(event).await {
                tracing::warn!(
                    owner = %registered.owner,
                    event = ?event.kind(),
                    error = %e,
                    "Event hook failed"
                );
            }
        }
        ran
    }
}

/// Non-owning view of the runtime handed to a cog during setup/teardown.
/// Every registration made through it is owned by `owner`.
pub struct RuntimeHandle<'a> {
    runtime: &'a mut Runtime,
    owner: String,
}

impl RuntimeHandle<'_> {
    /// Name of the cog this handle registers on behalf of
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.runtime.settings
    }

    /// Read-only access to the whole runtime
    pub fn runtime(&self) -> &Runtime {
        self.runtime
    }

    pub fn register_command<H>(
        &mut self,
        name: &str,
        description: &str,
        handler: H,
    ) -> Result<(), RegistryError>
    where
        H: CommandHandler + 'static,
    {
        self.runtime
            .commands
            .register(name, description, &self.owner, Arc::new(handler))?;
        tracing::trace!(cog = %self.owner, command = %name, "Registered command");
        Ok(())
    }

    pub fn register_event_hook<H>(&mut self, event: EventKind, hook: H)
    where
        H: EventHook + 'static,
    {
        self.runtime
            .hooks
            .register(event, &self.owner, Arc::new(hook));
        tracing::trace!(cog = %self.owner, event = ?event, "Registered event hook");
    }
}
