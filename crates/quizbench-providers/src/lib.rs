//! quizbench-providers — Chat-completion backends and configuration.
//!
//! Implements the `CompletionProvider` trait for OpenAI-compatible chat
//! endpoints (OpenRouter by default) and loads the `quizbench.toml` config.

pub mod config;
pub mod mock;
pub mod openrouter;

pub use config::{create_provider, load_config_from, ProviderConfig, QuizbenchConfig};
pub use quizbench_core::error::ProviderError;
