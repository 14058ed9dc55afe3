//! Chat-completion backend for OpenAI-compatible APIs.

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;
use sugeum_core::{ChatBackend, ChatRequest, ProviderConfig, ProviderFailure};
use tracing::{debug, warn};

use super::truncate_body;
use crate::{RemoteError, Result};

const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Bounded exponential backoff with jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request, including the first one. At least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each one after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay after failed attempt number `attempt` (1-based), before jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    /// Backoff plus up to half of it again, at random.
    fn jittered(&self, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        let max_jitter = u64::try_from(backoff.as_millis() / 2).unwrap_or(u64::MAX);
        let jitter = if max_jitter == 0 {
            0
        } else {
            rand::rng().random_range(0..=max_jitter)
        };
        backoff + Duration::from_millis(jitter)
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Backend posting to `{base_url}/chat/completions` with a bearer token.
pub struct OpenAiChatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl OpenAiChatBackend {
    /// Create a backend for `base_url` (like `https://api.deepseek.com/v1`).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Build a backend from configuration, reading the key from the environment.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| RemoteError::MissingCredential(config.api_key_env.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            retry: RetryPolicy {
                max_attempts: config.max_attempts.max(1),
                base_delay: Duration::from_millis(config.retry_base_delay_ms),
            },
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, request: &ChatRequest) -> std::result::Result<String, ProviderFailure> {
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderFailure::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        content_from_body(&body)
    }
}

impl ChatBackend for OpenAiChatBackend {
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, ProviderFailure> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(url = %self.endpoint(), model = %request.model, attempt, "sending chat completion");
            match self.send_once(request).await {
                Ok(content) => return Ok(content),
                Err(failure) if failure.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.jittered(attempt);
                    warn!(
                        error = %failure,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure),
            }
        }
    }
}

/// Content of the first choice of a `/chat/completions` response body.
pub(crate) fn content_from_body(body: &str) -> std::result::Result<String, ProviderFailure> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderFailure::MalformedPayload(format!("unexpected response body: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ProviderFailure::EmptyContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sugeum_core::ChatMessage;

    #[test]
    fn test_content_from_body() {
        let body = r#"{"id": "c1", "choices": [{"index": 0, "message": {"role": "assistant",
            "content": "{\"site_name\": \"북구청\"}"}, "finish_reason": "stop"}]}"#;

        assert_eq!(content_from_body(body), Ok(r#"{"site_name": "북구청"}"#.to_string()));
    }

    #[test]
    fn test_content_from_body_failures() {
        assert_eq!(content_from_body(r#"{"choices": []}"#), Err(ProviderFailure::EmptyContent));
        assert_eq!(
            content_from_body(r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(ProviderFailure::EmptyContent)
        );
        assert!(matches!(
            content_from_body("<html>Bad Gateway</html>"),
            Err(ProviderFailure::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(2000));
        assert_eq!(policy.backoff(10), MAX_BACKOFF);
    }

    #[test]
    fn test_jitter_bounds() {
        let policy = RetryPolicy::default();
        for _ in 0..20 {
            let delay = policy.jittered(2);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(1500));
        }
        assert_eq!(RetryPolicy::none().jittered(1), Duration::ZERO);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = OpenAiChatBackend::new("https://api.deepseek.com/v1/", "key");
        assert_eq!(backend.endpoint(), "https://api.deepseek.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let backend =
            OpenAiChatBackend::new("http://127.0.0.1:9", "key").with_retry(RetryPolicy::none());
        let request = ChatRequest {
            model: "deepseek-chat".into(),
            messages: vec![ChatMessage::user("북구청 잔금")],
            temperature: 0.1,
            response_format: None,
        };

        let result = backend.complete(&request).await;

        assert!(matches!(result, Err(ProviderFailure::Transport(_))));
    }
}
