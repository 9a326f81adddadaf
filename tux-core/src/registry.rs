// ABOUTME: Insertion-ordered command and event-hook registries with owner tags
// ABOUTME: Duplicate command names are rejected instead of silently replaced

use crate::traits::{CommandHandler, EventHook, EventKind};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command '{name}' is already registered by cog '{existing_owner}'")]
    DuplicateCommand {
        name: String,
        existing_owner: String,
    },
    #[error("invalid command name '{0}': must be non-empty and contain no whitespace")]
    InvalidCommandName(String),
    #[error("cog '{0}' is already attached")]
    CogAlreadyAttached(String),
}

/// A command as stored in the registry
#[derive(Clone)]
pub struct RegisteredCommand {
    pub name: String,
    pub description: String,
    /// Name of the cog that registered this command
    pub owner: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

/// Commands in the order they were registered
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names are case-insensitive.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        owner: &str,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), RegistryError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidCommandName(name));
        }

        if let Some(existing) = self.get(&name) {
            return Err(RegistryError::DuplicateCommand {
                name,
                existing_owner: existing.owner.clone(),
            });
        }

        self.commands.push(RegisteredCommand {
            name,
            description: description.to_string(),
            owner: owner.to_string(),
            handler,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        let name = name.to_lowercase();
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop every command owned by `owner`, returning how many were removed
    pub fn remove_owner(&mut self, owner: &str) -> usize {
        let before = self.commands.len();
        self.commands.retain(|c| c.owner != owner);
        before - self.commands.len()
    }
}

/// A hook as stored in the registry
#[derive(Clone)]
pub struct RegisteredHook {
    pub event: EventKind,
    pub owner: String,
    pub hook: Arc<dyn EventHook>,
}

/// Event hooks in the order they were registered. Several hooks may share an event.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<RegisteredHook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, event: EventKind, owner: &str, hook: Arc<dyn EventHook>) {
        self.hooks.push(RegisteredHook {
            event,
            owner: owner.to_string(),
            hook,
        });
    }

    /// Hooks subscribed to `event`, in registration order
    pub fn for_event(&self, event: EventKind) -> impl Iterator<Item = &RegisteredHook> {
        self.hooks.iter().filter(move |h| h.event == event)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredHook> {
        self.hooks.iter()
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn remove_owner(&mut self, owner: &str) -> usize {
        let before = self.hooks.len();
        self.hooks.retain(|h| h.owner != owner);
        before - self.hooks.len()
    }
}
