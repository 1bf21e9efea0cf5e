//! OpenAI-compatible chat-completion provider (OpenRouter by default).

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizbench_core::error::ProviderError;
use quizbench_core::traits::{CompletionProvider, CompletionRequest};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat-completion provider speaking the OpenAI wire format.
pub struct OpenRouterProvider {
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    pub fn new(api_key: &str, base_url: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout_secs)
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body));
        }
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status,
                message: body,
            });
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ResponseShape(format!("failed to parse response: {e}")))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| {
                ProviderError::ResponseShape("missing choices[0].message.content".into())
            })?;

        tracing::debug!(latency_ms = start.elapsed().as_millis() as u64, "completion received");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "a/m1:free".into(),
            system_prompt: "You are a quiz taker.".into(),
            prompt: "2+2?".into(),
            max_tokens: 4096,
            temperature: 0.1,
        }
    }

    #[tokio::test]
    async fn successful_completion() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "  4\n", "role": "assistant"}, "index": 0}],
            "model": "a/m1:free"
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("test-key", Some(server.uri()), 5).unwrap();
        let reply = provider.complete(&request()).await.unwrap();
        assert_eq!(reply, "4");
    }

    #[tokio::test]
    async fn request_body_has_two_turns() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "a/m1:free",
                "max_tokens": 4096,
                "temperature": 0.1,
                "messages": [
                    {"role": "system", "content": "You are a quiz taker."},
                    {"role": "user", "content": "2+2?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "four"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 5).unwrap();
        assert_eq!(provider.complete(&request()).await.unwrap(), "four");
    }

    #[tokio::test]
    async fn error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn missing_content_is_shape_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"error": {"message": "no credits"}})),
            )
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.is_response_shape());
    }

    #[tokio::test]
    async fn non_json_body_is_shape_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.is_response_shape());
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines.
        let provider =
            OpenRouterProvider::new("key", Some("http://127.0.0.1:9".into()), 5).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Transport(_) | ProviderError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = OpenRouterProvider::new("key", Some(server.uri()), 1).unwrap();
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(1)));
    }

    #[test]
    fn trailing_slash_in_base_url_is_dropped() {
        let provider =
            OpenRouterProvider::new("key", Some("http://localhost:1/".into()), 5).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1");
    }
}
