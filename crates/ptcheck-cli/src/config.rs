//! CLI configuration

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ptcheck_core::RuleKind;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PTCHECK_CONFIG";

/// Location of the config file
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ptcheck")
        .join("config.toml")
}

/// Configuration for the CLI. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format: table or json
    pub format: String,

    /// Placement rule for stops and platforms
    pub rule: RuleKind,

    /// Relations validated in parallel, unset means one per CPU
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            rule: RuleKind::default(),
            jobs: None,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or
    /// unreadable
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["format", "rule", "jobs"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "format" => Some(self.format.clone()),
            "rule" => Some(self.rule.to_string()),
            "jobs" => self.jobs.map(|j| j.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "format" => {
                self.format = OutputFormat::parse(value)?.as_str().to_string();
            }
            "rule" => {
                self.rule = value.parse().map_err(|_| {
                    anyhow::anyhow!(
                        "Unknown rule '{}'. Available rules: {}",
                        value,
                        RuleKind::names().join(", ")
                    )
                })?;
            }
            "jobs" => {
                let jobs: usize = value
                    .parse()
                    .with_context(|| format!("Invalid number of jobs: {}", value))?;
                if jobs == 0 {
                    anyhow::bail!("jobs must be at least 1");
                }
                self.jobs = Some(jobs);
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("rule", "incidence").unwrap();
        config.set("jobs", "3").unwrap();
        config.set("format", "JSON").unwrap();

        assert_eq!(config.get("rule").as_deref(), Some("incidence"));
        assert_eq!(config.get("jobs").as_deref(), Some("3"));
        assert_eq!(config.get("format").as_deref(), Some("json"));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("rule", "strict").is_err());
        assert!(config.set("jobs", "0").is_err());
        assert!(config.set("jobs", "many").is_err());
        assert!(config.set("format", "xml").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());
        // A directory exists but cannot be read as a file
        assert_eq!(Config::load_from(dir.path()), Config::default());

        let invalid = dir.path().join("invalid.toml");
        std::fs::write(&invalid, "jobs = \"many\"\n").unwrap();
        assert_eq!(Config::load_from(&invalid), Config::default());

        let valid = dir.path().join("valid.toml");
        std::fs::write(&valid, "format = \"json\"\njobs = 2\n").unwrap();
        let config = Config::load_from(&valid);
        assert_eq!(config.format, "json");
        assert_eq!(config.jobs, Some(2));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("rule = \"permissive\"\n").unwrap();
        assert_eq!(config.rule, RuleKind::Permissive);
        assert_eq!(config.format, "table");
        assert_eq!(config.jobs, None);
    }
}
