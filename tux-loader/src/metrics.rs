// ABOUTME: Load metrics recorded through the metrics facade
// ABOUTME: No-ops unless the host process installs a recorder

use crate::outcome::{LoadOutcome, LoadReport};
use metrics::{counter, gauge, histogram};

pub const COG_LOADS_TOTAL: &str = "tux_cog_loads_total";
pub const COG_LOAD_DURATION_SECONDS: &str = "tux_cog_load_duration_seconds";
pub const COGS_LOADED: &str = "tux_cogs_loaded";
pub const COGS_FAILED: &str = "tux_cogs_failed";

/// Record a single load attempt
pub fn record_load(outcome: &LoadOutcome) {
    let status = outcome.state().as_str();
    let category = outcome.category().map(|c| c.as_str()).unwrap_or("none");
    counter!(COG_LOADS_TOTAL, "status" => status, "category" => category).increment(1);
    histogram!(COG_LOAD_DURATION_SECONDS).record(outcome.elapsed().as_secs_f64());
}

/// Record the totals of a finished pass
pub fn record_pass(report: &LoadReport) {
    gauge!(COGS_LOADED).set(report.succeeded() as f64);
    gauge!(COGS_FAILED).set(report.failed() as f64);
}
