//! Configuration loading and provider factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbench_core::collector::CollectorConfig;
use quizbench_core::scoring::ScoringConfig;
use quizbench_core::traits::{CompletionProvider, DEFAULT_SYSTEM_PROMPT};

use crate::openrouter::{OpenRouterProvider, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

/// Settings for the completion endpoint.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key, may reference environment variables as `${VAR}`.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; a timed-out question gets an empty reply.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}

fn default_api_key() -> String {
    format!("${{{API_KEY_ENV}}}")
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_temperature() -> f64 {
    0.1
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl ProviderConfig {
    /// Collector settings for a run against `model`.
    pub fn collector_config(&self, model: &str) -> CollectorConfig {
        CollectorConfig {
            model: model.to_string(),
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Top-level quizbench configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizbenchConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve `${VAR}` references in file values, then let a non-empty
/// environment key replace the configured one verbatim.
fn apply_environment(config: &mut QuizbenchConfig, env_key: Option<String>) {
    config.provider.api_key = resolve_env_vars(&config.provider.api_key);
    config.provider.base_url = resolve_env_vars(&config.provider.base_url);

    if let Some(key) = env_key.filter(|k| !k.is_empty()) {
        config.provider.api_key = key;
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizbench.toml` in the current directory
/// 2. `~/.config/quizbench/config.toml`
///
/// `OPENROUTER_KEY` in the environment overrides the configured key.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbenchConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizbench.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<QuizbenchConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbenchConfig::default(),
    };

    apply_environment(&mut config, std::env::var(API_KEY_ENV).ok());

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbench"))
}

/// Create the completion provider. Fails when no API key is configured.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn CompletionProvider>> {
    anyhow::ensure!(
        !config.api_key.trim().is_empty(),
        "please set the {API_KEY_ENV} environment variable (e.g. in your .env file)"
    );

    let provider = OpenRouterProvider::new(
        &config.api_key,
        Some(config.base_url.clone()),
        config.timeout_secs,
    )?;
    Ok(Box::new(provider))
}
