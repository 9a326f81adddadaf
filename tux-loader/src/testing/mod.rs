// ABOUTME: Test helpers for code that loads cogs
// ABOUTME: Static cogs, a counting instantiator wrapper and an in-memory instantiator

mod static_cog;

pub use static_cog::{StaticCog, StaticCogConfig};

use crate::catalog::CogCatalog;
use crate::descriptor::{manifest_path, ModuleDescriptor};
use crate::instantiator::{setup_cog, Instantiate};
use crate::outcome::{FailureCategory, LoadOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tux_core::{Cog, Runtime};

/// Catalog with the "static" kind registered
pub fn test_catalog() -> CogCatalog {
    CogCatalog::new().register("static", StaticCog::factory())
}

/// Write a manifest for `name` (dotted) under `root`, creating directories
pub fn write_manifest(root: &Path, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    let path = manifest_path(root, name).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{name:?} is not a dotted cog name"),
        )
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Wraps an instantiator and records every call
pub struct CountingInstantiator<I> {
    inner: I,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl<I: Instantiate> CountingInstantiator<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Names passed to `load`, in call order
    pub fn seen(&self) -> Vec<String> {
        match self.seen.lock() {
            Ok(seen) => seen.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl<I: Instantiate> Instantiate for CountingInstantiator<I> {
    async fn load(&self, descriptor: &ModuleDescriptor, runtime: &mut Runtime) -> LoadOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(descriptor.name.clone());
        }
        self.inner.load(descriptor, runtime).await
    }
}

/// Instantiator over cogs held in memory, keyed by descriptor name.
/// Names without a cog fail with an import error.
#[derive(Default, Clone)]
pub struct InMemoryInstantiator {
    cogs: HashMap<String, Arc<dyn Cog>>,
}

impl InMemoryInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, cog: impl Cog + 'static) -> Self {
        self.cogs.insert(name.to_string(), Arc::new(cog));
        self
    }
}

#[async_trait]
impl Instantiate for InMemoryInstantiator {
    async fn load(&self, descriptor: &ModuleDescriptor, runtime: &mut Runtime) -> LoadOutcome {
        let started = Instant::now();
        match self.cogs.get(&descriptor.name) {
            Some(cog) => setup_cog(&descriptor.name, Arc::clone(cog), runtime, started).await,
            None => LoadOutcome::failure_with_trace(
                &descriptor.name,
                FailureCategory::Import,
                format!("no in-memory cog named '{}'", descriptor.name),
                None,
                started.elapsed(),
            ),
        }
    }
}
