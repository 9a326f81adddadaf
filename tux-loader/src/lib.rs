// ABOUTME: Cog loader for tux - discovers, loads, initializes and reports on command modules
// ABOUTME: Resolver -> Orchestrator (drives Instantiator per cog) -> Reporter

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod instantiator;
pub mod loader;
pub mod manifest;
pub mod metrics;
pub mod orchestrator;
pub mod outcome;
pub mod reporter;
pub mod resolver;

pub mod testing;

pub use catalog::{CogCatalog, CogFactory};
pub use descriptor::{LoadState, ModuleDescriptor};
pub use error::{LoaderError, ResolutionError};
pub use instantiator::{Instantiate, ManifestInstantiator};
pub use loader::{initialize, CogLoader};
pub use orchestrator::{run, LoadOptions};
pub use outcome::{FailureCategory, LoadOutcome, LoadReport};
pub use reporter::{FanoutReporter, Reporter, TracingReporter, WriterReporter};
pub use resolver::{DirectoryResolver, Resolve, StaticResolver};
