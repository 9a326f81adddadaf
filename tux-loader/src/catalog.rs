// ABOUTME: Catalog of cog implementations compiled into the binary
// ABOUTME: Cog kinds register factories; manifests create cogs by kind name with their config

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tux_core::Cog;

/// Factory function that creates a cog from its manifest config
pub type CogFactory = Box<dyn Fn(&Value) -> Result<Arc<dyn Cog>> + Send + Sync>;

/// Registry of cog kinds available to manifests
#[derive(Default)]
pub struct CogCatalog {
    factories: BTreeMap<String, CogFactory>,
}

impl CogCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cog factory by kind name
    pub fn register<F>(mut self, kind: &str, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<Arc<dyn Cog>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.to_string(), Box::new(factory));
        self
    }

    /// Register a cog kind that ignores config and is built with `Default`
    pub fn register_default<C>(self, kind: &str) -> Self
    where
        C: Cog + Default + 'static,
    {
        self.register(kind, |_config| Ok(Arc::new(C::default()) as Arc<dyn Cog>))
    }

    /// Create a cog by kind with the given config
    pub fn create(&self, kind: &str, config: &Value) -> Result<Arc<dyn Cog>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| anyhow!("Unknown cog kind: {}", kind))?;
        factory(config)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// List available cog kinds, sorted
    pub fn available(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl std::fmt::Debug for CogCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CogCatalog")
            .field("kinds", &self.available())
            .finish()
    }
}
