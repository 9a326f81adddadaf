// ABOUTME: Drives one load pass: resolve, then load every cog in order, never stopping early
// ABOUTME: Applies the optional per-cog deadline and the debug/terse report policy

use crate::descriptor::{LoadState, ModuleDescriptor};
use crate::error::ResolutionError;
use crate::instantiator::Instantiate;
use crate::metrics;
use crate::outcome::{FailureCategory, LoadOutcome, LoadReport};
use crate::resolver::Resolve;
use std::time::{Duration, Instant};
use tracing::Instrument;
use tux_core::Runtime;

/// Options for a load pass
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Keep full trace detail for failures in the report
    pub debug: bool,
    /// Deadline for each cog's load. None waits forever.
    pub setup_timeout: Option<Duration>,
}

impl LoadOptions {
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn setup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.setup_timeout = timeout;
        self
    }
}

/// Resolve all cogs and load each one, in order, exactly once.
///
/// Only a resolution failure is returned as an error; per-cog failures are
/// recorded in the report and the pass continues.
pub async fn run<R, I>(
    resolver: &R,
    instantiator: &I,
    runtime: &mut Runtime,
    options: &LoadOptions,
) -> Result<LoadReport, ResolutionError>
where
    R: Resolve + ?Sized,
    I: Instantiate + ?Sized,
{
    let descriptors = resolver.resolve()?;
    tracing::info!(count = descriptors.len(), "Loading cogs");

    let mut builder = LoadReport::builder(options.debug);
    for descriptor in &descriptors {
        let span = tracing::info_span!("cog", cog = %descriptor.name);
        let outcome = load_one(instantiator, descriptor, runtime, options.setup_timeout)
            .instrument(span)
            .await;
        builder.push(outcome);
    }

    let report = builder.finish();
    metrics::record_pass(&report);
    tracing::debug!(
        total = report.total(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Load pass finished"
    );
    Ok(report)
}

/// Load a single descriptor, applying the deadline and recording metrics
pub async fn load_one<I>(
    instantiator: &I,
    descriptor: &ModuleDescriptor,
    runtime: &mut Runtime,
    timeout: Option<Duration>,
) -> LoadOutcome
where
    I: Instantiate + ?Sized,
{
    tracing::debug!(from = %LoadState::Pending, to = %LoadState::Loading, "Cog state");
    let started = Instant::now();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, instantiator.load(descriptor, runtime)).await
        {
            Ok(outcome) => outcome,
            Err(_) => LoadOutcome::failure_with_trace(
                &descriptor.name,
                FailureCategory::Timeout,
                format!("load did not complete within {:?}", limit),
                None,
                started.elapsed(),
            ),
        },
        None => instantiator.load(descriptor, runtime).await,
    };

    tracing::debug!(from = %LoadState::Loading, to = %outcome.state(), "Cog state");
    metrics::record_load(&outcome);
    outcome
}
