// ABOUTME: Loads one cog: import (manifest + catalog + factory) then setup against the runtime
// ABOUTME: Every error and panic is converted to a LoadOutcome at this boundary

use crate::catalog::CogCatalog;
use crate::descriptor::ModuleDescriptor;
use crate::manifest::CogManifest;
use crate::outcome::{FailureCategory, LoadOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tux_core::{Cog, Runtime};

/// Loads a single cog. Implementations must never panic or return early
/// without an outcome; failures are values.
#[async_trait]
pub trait Instantiate: Send + Sync {
    async fn load(&self, descriptor: &ModuleDescriptor, runtime: &mut Runtime) -> LoadOutcome;
}

/// Instantiator backed by on-disk manifests and a compiled-in catalog
pub struct ManifestInstantiator {
    catalog: Arc<CogCatalog>,
}

impl ManifestInstantiator {
    pub fn new(catalog: Arc<CogCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CogCatalog {
        &self.catalog
    }

    /// Read the manifest and construct the cog it names
    fn import(&self, descriptor: &ModuleDescriptor) -> Result<Arc<dyn Cog>> {
        let manifest = CogManifest::load(&descriptor.path)?;
        let kind = manifest.kind(descriptor);

        if !self.catalog.contains(kind) {
            anyhow::bail!(
                "Unknown cog kind '{}' (available: {})",
                kind,
                self.catalog.available().join(", ")
            );
        }

        self.catalog
            .create(kind, &manifest.config_value())
            .with_context(|| format!("Failed to construct cog '{}'", kind))
    }
}

#[async_trait]
impl Instantiate for ManifestInstantiator {
    async fn load(&self, descriptor: &ModuleDescriptor, runtime: &mut Runtime) -> LoadOutcome {
        let started = Instant::now();

        let cog = match catch_unwind(AssertUnwindSafe(|| self.import(descriptor))) {
            Ok(Ok(cog)) => cog,
            Ok(Err(e)) => {
                return LoadOutcome::failure(
                    &descriptor.name,
                    FailureCategory::Import,
                    &e,
                    started.elapsed(),
                )
            }
            Err(payload) => {
                return panic_outcome(
                    &descriptor.name,
                    FailureCategory::Import,
                    payload,
                    started.elapsed(),
                )
            }
        };

        setup_cog(&descriptor.name, cog, runtime, started).await
    }
}

/// Run `cog.setup` under `name` and attach it on success.
///
/// Registrations made before a failure stay in the runtime.
pub async fn setup_cog(
    name: &str,
    cog: Arc<dyn Cog>,
    runtime: &mut Runtime,
    started: Instant,
) -> LoadOutcome {
    let commands_before = runtime.commands().len();
    let hooks_before = runtime.hooks().len();

    let result = {
        let mut handle = runtime.handle(name);
        AssertUnwindSafe(cog.setup(&mut handle))
            .catch_unwind()
            .await
    };

    let elapsed = started.elapsed();
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return LoadOutcome::failure(name, FailureCategory::Setup, &e, elapsed),
        Err(payload) => return panic_outcome(name, FailureCategory::Setup, payload, elapsed),
    }

    if let Err(e) = runtime.attach(name, cog) {
        let e = anyhow::Error::new(e);
        return LoadOutcome::failure(name, FailureCategory::Setup, &e, elapsed);
    }

    LoadOutcome::Success {
        name: name.to_string(),
        commands_added: runtime.commands().len().saturating_sub(commands_before),
        hooks_added: runtime.hooks().len().saturating_sub(hooks_before),
        elapsed,
    }
}

fn panic_outcome(
    name: &str,
    category: FailureCategory,
    payload: Box<dyn Any + Send>,
    elapsed: Duration,
) -> LoadOutcome {
    let message = panic_message(payload.as_ref());
    LoadOutcome::failure_with_trace(
        name,
        category,
        format!("panicked: {}", message),
        Some(format!("panic payload: {}", message)),
        elapsed,
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
