// ABOUTME: Configuration parsing from TOML file with environment variable overrides
// ABOUTME: Validates fields and provides sensible defaults for everything
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tux_core::commands::DEFAULT_PREFIX;
use tux_core::RuntimeSettings;
use tux_loader::LoadOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub cogs: CogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Keep full failure traces in load reports and raise log verbosity
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CogsConfig {
    #[serde(default = "default_cogs_root")]
    pub root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_timeout_secs: Option<u64>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_cogs_root() -> PathBuf {
    PathBuf::from("./cogs")
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            debug: false,
        }
    }
}

impl Default for CogsConfig {
    fn default() -> Self {
        Self {
            root: default_cogs_root(),
            setup_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration with environment variable overrides.
    ///
    /// Looks at `TUX_CONFIG_PATH`, then `./config.toml`, then the XDG config
    /// file. Falls back to defaults when none exist.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("TUX_CONFIG_PATH").ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref())
    }

    /// Load from `path` if given (it must exist), else from the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => match default_locations().into_iter().find(|p| p.exists()) {
                Some(path) => Self::read(&path)?,
                None => Config::default(),
            },
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without env overrides or validation
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("TUX_PREFIX") {
            self.bot.prefix = val;
        }
        if let Ok(val) = std::env::var("TUX_DEBUG") {
            self.bot.debug = parse_bool(&val)
                .with_context(|| format!("TUX_DEBUG must be a boolean, got: {}", val))?;
        }
        if let Ok(val) = std::env::var("TUX_COGS_DIR") {
            self.cogs.root = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TUX_SETUP_TIMEOUT_SECS") {
            let secs = val.parse().with_context(|| {
                format!(
                    "TUX_SETUP_TIMEOUT_SECS must be a whole number of seconds, got: {}",
                    val
                )
            })?;
            self.cogs.setup_timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Check invariants that serde can't express
    pub fn validate(&self) -> Result<()> {
        if self.bot.prefix.trim().is_empty() {
            anyhow::bail!("bot.prefix must not be empty (set in config.toml or TUX_PREFIX env var)");
        }
        if self.bot.prefix.contains(char::is_whitespace) {
            anyhow::bail!("bot.prefix must not contain whitespace: {:?}", self.bot.prefix);
        }
        if self.cogs.setup_timeout_secs == Some(0) {
            anyhow::bail!("cogs.setup_timeout_secs must be greater than 0 when set");
        }
        Ok(())
    }

    pub fn setup_timeout(&self) -> Option<Duration> {
        self.cogs.setup_timeout_secs.map(Duration::from_secs)
    }

    pub fn runtime_settings(&self) -> RuntimeSettings {
        RuntimeSettings {
            prefix: self.bot.prefix.clone(),
            debug: self.bot.debug,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default()
            .debug(self.bot.debug)
            .setup_timeout(self.setup_timeout())
    }
}

fn default_locations() -> Vec<PathBuf> {
    vec![PathBuf::from("config.toml"), crate::paths::config_file()]
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(parse_bool(" on ").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.bot.prefix, ">");
        assert_eq!(config.cogs.root, PathBuf::from("./cogs"));
        assert!(config.setup_timeout().is_none());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.cogs.setup_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
