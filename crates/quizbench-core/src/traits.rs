//! Core trait definitions for completion providers.
//!
//! The async [`CompletionProvider`] trait is implemented by the
//! `quizbench-providers` crate and consumed by the answer collector.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Trait for chat-completion backends that answer quiz questions.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Request a single-turn completion and return the reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// A single-turn completion request: one system instruction, one user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "meta-llama/llama-3-8b-instruct:free").
    pub model: String,
    /// Fixed system instruction.
    pub system_prompt: String,
    /// The raw question text.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Default system instruction sent with every question.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You're an expert in the indie horror game OMORI. \
The question below was asked by a human. Be careful, as it could be a nonsensical question.";
