// ABOUTME: Cogs compiled into the tux binary and the catalog that exposes them
// ABOUTME: Manifests under the cog root pick one of these by kind

pub mod help;
pub mod ping;

pub use help::{HelpCog, HelpConfig};
pub use ping::{PingCog, PingConfig};

use std::sync::Arc;
use tux_core::Cog;
use tux_loader::CogCatalog;

/// Catalog of every cog kind this binary can load
pub fn builtin_catalog() -> CogCatalog {
    CogCatalog::new()
        .register("ping", |config| {
            Ok(Arc::new(PingCog::from_value(config)?) as Arc<dyn Cog>)
        })
        .register("help", |config| {
            Ok(Arc::new(HelpCog::from_value(config)?) as Arc<dyn Cog>)
        })
}
