//! Where completion calls go: endpoint, credentials, model and timeout.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LlmResult;

/// Base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

const API_URL_VARS: &[&str] = &["SOLFLOW_API_URL", "OPENAI_API_URL"];
const API_KEY_VARS: &[&str] = &["SOLFLOW_API_KEY", "OPENAI_API_KEY"];
const MODEL_VARS: &[&str] = &["SOLFLOW_MODEL", "OPENAI_MODEL_NAME"];
const TIMEOUT_VARS: &[&str] = &["SOLFLOW_REQUEST_TIMEOUT_SECS"];

/// OpenAI-compatible provider definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_url: String,

    /// Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub model_name: String,

    /// Whole-request timeout. `None` waits for as long as the provider takes.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| env::var(key).ok());
        config
    }

    /// Override fields from an environment lookup.
    ///
    /// For each field the first variable that is set and non-blank wins.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        if let Some(url) = first(API_URL_VARS) {
            self.api_url = url;
        }
        if let Some(key) = first(API_KEY_VARS) {
            self.api_key = Some(key);
        }
        if let Some(model) = first(MODEL_VARS) {
            self.model_name = model;
        }
        if let Some(secs) = first(TIMEOUT_VARS).and_then(|raw| raw.parse().ok()) {
            self.request_timeout_secs = Some(secs);
        }
    }

    /// Load from a TOML file with a `[provider]` table.
    pub fn load_from_toml<P: AsRef<Path>>(path: P) -> LlmResult<Self> {
        #[derive(Deserialize)]
        struct ProviderFile {
            provider: ProviderConfig,
        }

        let raw = fs::read_to_string(path.as_ref())?;
        let file: ProviderFile = toml::from_str(&raw)?;
        Ok(file.provider)
    }

    /// `{api_url}/chat/completions`, tolerating a trailing slash.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }

    /// The API key with everything but its last four characters hidden.
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let count = key.chars().count();
            if count <= 4 {
                return "****".to_string();
            }
            let tail: String = key.chars().skip(count - 4).collect();
            format!("****{tail}")
        })
    }
}
