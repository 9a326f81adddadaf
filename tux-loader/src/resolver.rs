// ABOUTME: Discovers cog manifests under a root directory in deterministic order
// ABOUTME: Skips package markers (_*), hidden entries and non-manifest files

use crate::descriptor::{manifest_path, ModuleDescriptor, MANIFEST_EXTENSION};
use crate::error::ResolutionError;
use std::path::{Path, PathBuf};

/// Produces the ordered set of cogs to load
pub trait Resolve {
    fn resolve(&self) -> Result<Vec<ModuleDescriptor>, ResolutionError>;
}

/// Resolver over a directory tree of `*.toml` cog manifests
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a single cog by dotted name. Only names the walk would
    /// produce are accepted, so nothing outside the root is reachable.
    pub fn find(&self, name: &str) -> Option<ModuleDescriptor> {
        if name.split('.').any(is_excluded_name) {
            return None;
        }
        let path = manifest_path(&self.root, name)?;
        path.is_file().then(|| ModuleDescriptor::new(name, path))
    }

    fn check_root(&self) -> Result<(), ResolutionError> {
        let metadata = match std::fs::metadata(&self.root) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ResolutionError::NotFound(self.root.clone()))
            }
            Err(source) => {
                return Err(ResolutionError::Unreadable {
                    path: self.root.clone(),
                    source,
                })
            }
        };
        if !metadata.is_dir() {
            return Err(ResolutionError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }

    fn walk(&self, dir: &Path, found: &mut Vec<ModuleDescriptor>) -> Result<(), ResolutionError> {
        let unreadable = |source| ResolutionError::Unreadable {
            path: dir.to_path_buf(),
            source,
        };

        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let path = entry.path();
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                tracing::debug!(path = %path.display(), "Skipping non-UTF-8 entry");
                continue;
            };
            if is_excluded_name(file_name) {
                continue;
            }

            let file_type = entry.file_type().map_err(unreadable)?;
            if file_type.is_dir() {
                self.walk(&path, found)?;
            } else if is_manifest(&path) {
                match ModuleDescriptor::from_path(&self.root, &path) {
                    Some(descriptor) => found.push(descriptor),
                    None => tracing::warn!(
                        path = %path.display(),
                        "Skipping manifest: dots in a file or directory name clash with dotted cog names"
                    ),
                }
            }
        }
        Ok(())
    }
}

impl Resolve for DirectoryResolver {
    fn resolve(&self) -> Result<Vec<ModuleDescriptor>, ResolutionError> {
        self.check_root()?;

        let mut found = Vec::new();
        self.walk(&self.root, &mut found)?;

        if found.is_empty() {
            return Err(ResolutionError::Empty(self.root.clone()));
        }

        // Names are unique: dotted path components never produce a descriptor
        found.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            root = %self.root.display(),
            count = found.len(),
            "Resolved cog manifests"
        );
        Ok(found)
    }
}

/// Package markers (`__init__`, `_index`) and hidden files are not cogs
fn is_excluded_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

fn is_manifest(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(MANIFEST_EXTENSION)
}

/// Resolver over a fixed list of descriptors, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    descriptors: Vec<ModuleDescriptor>,
}

impl StaticResolver {
    pub fn new(descriptors: Vec<ModuleDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Descriptors named after `names`, with placeholder paths
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let descriptors = names
            .into_iter()
            .map(|n| {
                let name = n.into();
                let path = PathBuf::from(format!("{name}.{MANIFEST_EXTENSION}"));
                ModuleDescriptor::new(name, path)
            })
            .collect();
        Self { descriptors }
    }
}

impl Resolve for StaticResolver {
    fn resolve(&self) -> Result<Vec<ModuleDescriptor>, ResolutionError> {
        if self.descriptors.is_empty() {
            return Err(ResolutionError::Empty(PathBuf::new()));
        }
        Ok(self.descriptors.clone())
    }
}
