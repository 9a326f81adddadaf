// ABOUTME: Typed errors that can escape the loader
// ABOUTME: Per-cog import/setup failures never appear here; they are LoadOutcome values

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The cog root could not be enumerated. Always fatal for startup.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("cog root {0} does not exist")]
    NotFound(PathBuf),
    #[error("cog root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cog root {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cog root {0} contains no cog manifests")]
    Empty(PathBuf),
}

/// Errors from runtime load/unload/reload of a single cog
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("cog '{0}' is already loaded")]
    AlreadyLoaded(String),
    #[error("cog '{0}' is not loaded")]
    NotLoaded(String),
    #[error("no cog manifest named '{0}' under the cog root")]
    UnknownCog(String),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}
