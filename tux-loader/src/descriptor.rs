// ABOUTME: ModuleDescriptor identifies one loadable cog manifest; LoadState tracks its lifecycle
// ABOUTME: Names are derived from the manifest path relative to the cog root

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Extension every cog manifest carries
pub const MANIFEST_EXTENSION: &str = "toml";

/// One loadable unit found under the cog root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleDescriptor {
    /// Dotted logical name, e.g. `utility.ping`
    pub name: String,
    /// Absolute or root-joined path to the manifest
    pub path: PathBuf,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a descriptor for `path`, naming it relative to `root`.
    /// Returns None if `path` is not under `root` or has no file stem.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let name = module_name(root, path)?;
        Some(Self::new(name, path))
    }

    /// Last dotted segment of the name (`utility.ping` -> `ping`)
    pub fn stem(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Map `root/utility/ping.toml` to `utility.ping`.
///
/// Returns None when a directory or stem contains a dot, since such a path
/// could not be told apart from a nested one by its dotted name.
pub fn module_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str()?;
                if !is_name_segment(part) {
                    return None;
                }
                segments.push(part.to_string());
            }
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("."))
}

/// Map `utility.ping` back to `root/utility/ping.toml`.
/// Returns None for names that would escape `root` or do not round-trip.
pub fn manifest_path(root: &Path, name: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for segment in name.split('.') {
        if !is_name_segment(segment) {
            return None;
        }
        path.push(segment);
    }
    path.set_extension(MANIFEST_EXTENSION);
    path.starts_with(root).then_some(path)
}

/// One dotted segment must be exactly one plain path component
fn is_name_segment(segment: &str) -> bool {
    if segment.is_empty() || segment.contains(['.', '/', '\\']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part.to_str() == Some(segment)
    )
}

/// Lifecycle of a cog as tracked by the loader.
///
/// `Pending -> Loading -> {Succeeded | Failed}` within one pass;
/// `Succeeded -> Unloaded` on explicit unload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loading,
    Succeeded,
    Failed,
    Unloaded,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Pending => "pending",
            LoadState::Loading => "loading",
            LoadState::Succeeded => "loaded",
            LoadState::Failed => "failed",
            LoadState::Unloaded => "unloaded",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Succeeded | LoadState::Failed)
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
