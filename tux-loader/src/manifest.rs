// ABOUTME: Cog manifest parsing - the TOML file that names a cog kind and its config
// ABOUTME: An empty manifest is valid and uses the file stem as the cog kind

use crate::descriptor::ModuleDescriptor;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Contents of one cog manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CogManifest {
    /// Catalog key of the cog implementation. Defaults to the manifest's file stem.
    #[serde(default)]
    pub cog: Option<String>,
    /// Free-form description shown in reports
    #[serde(default)]
    pub description: Option<String>,
    /// Table handed verbatim to the cog factory
    #[serde(default)]
    pub config: Option<Value>,
}

impl CogManifest {
    /// Parse manifest text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse cog manifest")
    }

    /// Read and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cog manifest {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid cog manifest {}", path.display()))
    }

    /// The catalog key this manifest refers to
    pub fn kind<'a>(&'a self, descriptor: &'a ModuleDescriptor) -> &'a str {
        self.cog.as_deref().unwrap_or_else(|| descriptor.stem())
    }

    /// Factory config, `{}` when the manifest has none
    pub fn config_value(&self) -> Value {
        self.config
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_manifest_uses_stem() {
        let manifest = CogManifest::parse("").unwrap();
        let descriptor = ModuleDescriptor::new("utility.ping", "utility/ping.toml");
        assert_eq!(manifest.kind(&descriptor), "ping");
        assert_eq!(manifest.config_value(), json!({}));
    }

    #[test]
    fn test_manifest_with_kind_and_config() {
        let manifest = CogManifest::parse(
            r#"
cog = "ping"
description = "Latency check"

[config]
reply = "Pong!"
show_uptime = false
"#,
        )
        .unwrap();
        let descriptor = ModuleDescriptor::new("status", "status.toml");
        assert_eq!(manifest.kind(&descriptor), "ping");
        assert_eq!(manifest.description.as_deref(), Some("Latency check"));
        assert_eq!(
            manifest.config_value(),
            json!({"reply": "Pong!", "show_uptime": false})
        );
    }

    #[test]
    fn test_manifest_rejects_unknown_keys() {
        let err = CogManifest::parse("cgo = \"ping\"").unwrap_err();
        assert!(format!("{:#}", err).contains("cgo"));
    }

    #[test]
    fn test_manifest_rejects_bad_toml() {
        assert!(CogManifest::parse("cog = ").is_err());
    }
}
