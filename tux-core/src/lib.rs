// ABOUTME: Runtime model for the tux chat agent
// ABOUTME: Provides the shared registry, cog traits and command parsing used by loader and binary

pub mod commands;
pub mod registry;
pub mod runtime;
pub mod traits;

pub use commands::{parse_message, Command, ParseResult};
pub use registry::{RegisteredCommand, RegisteredHook, RegistryError};
pub use runtime::{DispatchResult, Runtime, RuntimeHandle, RuntimeSettings};
pub use traits::{Cog, CommandContext, CommandHandler, Event, EventHook, EventKind};
