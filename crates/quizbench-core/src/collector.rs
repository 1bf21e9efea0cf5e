//! Answer collector.
//!
//! Sends every parsed question to a completion provider, strictly one at a
//! time and in document order, and assembles the replies into a
//! [`ResultDocument`]. A failed request never aborts the run: the question
//! gets an empty reply and the failure is logged.

use std::sync::Arc;

use crate::error::ProviderError;
use crate::model::{Grading, ResultDocument, Section};
use crate::traits::{CompletionProvider, CompletionRequest, DEFAULT_SYSTEM_PROMPT};

/// Settings applied to every completion request.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Model identifier recorded in the result document.
    pub model: String,
    /// System instruction.
    pub system_prompt: String,
    /// Max tokens for each reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl CollectorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 4096,
            temperature: 0.1,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_start(&self, total: usize);
    fn on_section(&self, section_name: &str, first: bool);
    fn on_question_complete(&self, completed: usize, total: usize);
    fn on_question_error(&self, section_name: &str, question: &str, error: &ProviderError);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_start(&self, _: usize) {}
    fn on_section(&self, _: &str, _: bool) {}
    fn on_question_complete(&self, _: usize, _: usize) {}
    fn on_question_error(&self, _: &str, _: &str, _: &ProviderError) {}
}

pub struct AnswerCollector {
    provider: Arc<dyn CompletionProvider>,
    config: CollectorConfig,
}

impl AnswerCollector {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: CollectorConfig) -> Self {
        Self { provider, config }
    }

    /// Collect a reply for every question and build the result document.
    ///
    /// Each question ends with `reply` set (empty on failure) and
    /// `correct` reset to [`Grading::Unknown`].
    pub async fn collect(
        &self,
        mut sections: Vec<Section>,
        progress: &dyn ProgressReporter,
    ) -> ResultDocument {
        let total: usize = sections.iter().map(|s| s.questions.len()).sum();
        progress.on_start(total);

        let mut completed = 0;
        for (i, section) in sections.iter_mut().enumerate() {
            progress.on_section(&section.section_name, i == 0);

            for record in &mut section.questions {
                let reply = match self.ask(&record.question).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        tracing::warn!(
                            section = %section.section_name,
                            question = %record.question,
                            "recording empty reply: {e}"
                        );
                        progress.on_question_error(&section.section_name, &record.question, &e);
                        String::new()
                    }
                };

                record.reply = Some(reply);
                record.correct = Grading::Unknown;

                completed += 1;
                progress.on_question_complete(completed, total);
            }
        }

        ResultDocument::new(self.config.model.clone(), sections)
    }

    async fn ask(&self, question: &str) -> Result<String, ProviderError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system_prompt: self.config.system_prompt.clone(),
            prompt: question.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let reply = self.provider.complete(&request).await?;
        Ok(reply.trim().to_string())
    }
}
