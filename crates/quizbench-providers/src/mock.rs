//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizbench_core::error::ProviderError;
use quizbench_core::traits::{CompletionProvider, CompletionRequest};

/// A mock provider for exercising the collector without real API calls.
///
/// Replies are chosen by matching a substring of the question; questions
/// listed with [`MockProvider::failing_on`] return a transport error.
pub struct MockProvider {
    /// Map of question substring → reply.
    responses: HashMap<String, String>,
    /// Question substrings that fail.
    failures: Vec<String>,
    /// Reply if no question matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Requests received, in order.
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with the given question→reply mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            failures: Vec::new(),
            default_response: "I don't know.".to_string(),
            call_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        let mut mock = Self::new(HashMap::new());
        mock.default_response = response.to_string();
        mock
    }

    /// Fail every question containing `substring`.
    pub fn failing_on(mut self, substring: &str) -> Self {
        self.failures.push(substring.to_string());
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Questions received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|req| req.prompt.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if self.failures.iter().any(|f| request.prompt.contains(f.as_str())) {
            return Err(ProviderError::Transport("mock failure".into()));
        }

        Ok(self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: "mock".into(),
            system_prompt: String::new(),
            prompt: prompt.into(),
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("42");
        assert_eq!(provider.complete(&request("anything")).await.unwrap(), "42");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn question_matching_and_failures() {
        let mut responses = HashMap::new();
        responses.insert("cat".to_string(), "Mewo".to_string());

        let provider = MockProvider::new(responses).failing_on("broken");

        assert_eq!(
            provider.complete(&request("Name the cat")).await.unwrap(),
            "Mewo"
        );
        assert!(provider.complete(&request("broken question")).await.is_err());
        assert_eq!(provider.prompts(), vec!["Name the cat", "broken question"]);
    }
}
