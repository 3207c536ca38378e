//! CLI configuration management.
//!
//! Precedence, highest first: command-line flags, environment variables
//! (after loading `.env`), the JSON config file, defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use solflow_llm::ProviderConfig;

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion endpoint, credentials, model and timeout.
    #[serde(flatten)]
    pub provider: ProviderConfig,

    /// Start the window in dark mode.
    pub dark_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            dark_mode: true,
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub provider_file: Option<PathBuf>,
    pub model: Option<String>,
    pub api_url: Option<String>,
}

impl Overrides {
    /// `--config` if given, else the platform default.
    pub fn config_location(&self) -> Option<PathBuf> {
        self.config_file.clone().or_else(Config::config_file_path)
    }
}

impl Config {
    /// Load configuration from every source.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = match overrides.config_location() {
            Some(path) if path.exists() => Self::read_file(&path)?,
            Some(path) if overrides.config_file.is_some() => {
                anyhow::bail!("Config file not found: {}", path.display())
            }
            _ => Self::default(),
        };

        if let Some(provider_file) = &overrides.provider_file {
            config.provider = ProviderConfig::load_from_toml(provider_file).with_context(|| {
                format!("Failed to load provider from {}", provider_file.display())
            })?;
        }

        config.provider.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply command-line values on top of everything else.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(model) = &overrides.model {
            self.provider.model_name = model.clone();
        }
        if let Some(api_url) = &overrides.api_url {
            self.provider.api_url = api_url.clone();
        }
    }

    /// Get the path to the config file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "solflow", "solflow")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
