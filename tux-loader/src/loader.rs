// ABOUTME: CogLoader ties resolver, instantiator and reporter together for startup and admin use
// ABOUTME: Supports initial load of the whole tree plus load/unload/reload of single cogs

use crate::catalog::CogCatalog;
use crate::descriptor::LoadState;
use crate::error::{LoaderError, ResolutionError};
use crate::instantiator::ManifestInstantiator;
use crate::orchestrator::{self, LoadOptions};
use crate::outcome::{LoadOutcome, LoadReport};
use crate::reporter::Reporter;
use crate::resolver::DirectoryResolver;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tux_core::Runtime;

/// Loads cogs from a manifest directory into a runtime and tracks their state
pub struct CogLoader {
    resolver: DirectoryResolver,
    instantiator: ManifestInstantiator,
    options: LoadOptions,
    states: BTreeMap<String, LoadState>,
}

impl CogLoader {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<CogCatalog>) -> Self {
        Self {
            resolver: DirectoryResolver::new(root),
            instantiator: ManifestInstantiator::new(catalog),
            options: LoadOptions::default(),
            states: BTreeMap::new(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Load every cog under the root and emit the report.
    ///
    /// Fails only if the root cannot be enumerated or holds no cogs.
    pub async fn initialize(
        &mut self,
        runtime: &mut Runtime,
        reporter: &dyn Reporter,
    ) -> Result<LoadReport, ResolutionError> {
        let report =
            orchestrator::run(&self.resolver, &self.instantiator, runtime, &self.options).await?;

        for entry in report.entries() {
            self.states.insert(entry.name().to_string(), entry.state());
        }

        reporter.emit(&report);
        Ok(report)
    }

    /// Load one cog by dotted name
    pub async fn load(
        &mut self,
        name: &str,
        runtime: &mut Runtime,
    ) -> Result<LoadOutcome, LoaderError> {
        if runtime.is_attached(name) {
            return Err(LoaderError::AlreadyLoaded(name.to_string()));
        }
        let descriptor = self
            .resolver
            .find(name)
            .ok_or_else(|| LoaderError::UnknownCog(name.to_string()))?;

        // A previous failed attempt may have left registrations behind
        let (commands, hooks) = runtime.remove_owner(name);
        if commands + hooks > 0 {
            tracing::warn!(
                cog = %name,
                commands,
                hooks,
                "Cleared registrations left by an earlier failed load"
            );
        }

        self.states.insert(name.to_string(), LoadState::Loading);
        let outcome = orchestrator::load_one(
            &self.instantiator,
            &descriptor,
            runtime,
            self.options.setup_timeout,
        )
        .await;
        let outcome = if self.options.debug {
            outcome
        } else {
            outcome.into_terse()
        };
        self.states.insert(name.to_string(), outcome.state());

        match &outcome {
            LoadOutcome::Success { .. } => tracing::info!(cog = %name, "Cog loaded"),
            LoadOutcome::Failure {
                category, message, ..
            } => tracing::error!(
                cog = %name,
                category = %category,
                error = %message,
                "Cog failed to load"
            ),
        }
        Ok(outcome)
    }

    /// Tear down a loaded cog and remove everything it registered
    pub async fn unload(&mut self, name: &str, runtime: &mut Runtime) -> Result<(), LoaderError> {
        let cog = runtime
            .detach(name)
            .ok_or_else(|| LoaderError::NotLoaded(name.to_string()))?;

        let teardown = {
            let mut handle = runtime.handle(name);
            AssertUnwindSafe(cog.teardown(&mut handle))
                .catch_unwind()
                .await
        };
        match teardown {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(cog = %name, error = %e, "Cog teardown failed"),
            Err(_) => tracing::warn!(cog = %name, "Cog teardown panicked"),
        }

        let (commands, hooks) = runtime.remove_owner(name);
        self.states.insert(name.to_string(), LoadState::Unloaded);
        tracing::info!(cog = %name, commands, hooks, "Cog unloaded");
        Ok(())
    }

    /// Unload (if loaded) and load again from the manifest.
    /// A name that no longer resolves leaves the loaded cog in place.
    pub async fn reload(
        &mut self,
        name: &str,
        runtime: &mut Runtime,
    ) -> Result<LoadOutcome, LoaderError> {
        if self.resolver.find(name).is_none() {
            return Err(LoaderError::UnknownCog(name.to_string()));
        }
        if runtime.is_attached(name) {
            self.unload(name, runtime).await?;
        }
        self.load(name, runtime).await
    }

    /// Latest known state for a cog
    pub fn state(&self, name: &str) -> Option<LoadState> {
        self.states.get(name).copied()
    }

    /// All known cogs and their states, sorted by name
    pub fn states(&self) -> impl Iterator<Item = (&str, LoadState)> {
        self.states.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

/// Startup entry point: load every cog under `root` into `runtime` and report.
pub async fn initialize(
    root: impl Into<PathBuf>,
    catalog: Arc<CogCatalog>,
    runtime: &mut Runtime,
    options: LoadOptions,
    reporter: &dyn Reporter,
) -> Result<LoadReport, ResolutionError> {
    CogLoader::new(root, catalog)
        .with_options(options)
        .initialize(runtime, reporter)
        .await
}
