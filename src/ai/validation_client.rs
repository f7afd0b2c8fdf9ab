//! Prompt-in/text-out wrapper around an [`AIClient`] with per-attempt
//! timeout and bounded retry.
//!
//! A call that times out or exhausts its retries surfaces as a single error,
//! so callers count it as one failure.

use super::{AIClient, AIError, ChatMessage, ChatRequest, ModelParameters, RetryPolicy};
use crate::config::AIConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct AiValidationClient {
    client: Arc<dyn AIClient>,
    model: String,
    parameters: ModelParameters,
    timeout: Duration,
    retry: RetryPolicy,
}

impl AiValidationClient {
    /// Wrap `client` with a 30s timeout and the default retry policy
    pub fn new(client: Arc<dyn AIClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            parameters: ModelParameters::default(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_config(client: Arc<dyn AIClient>, config: &AIConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            parameters: ModelParameters {
                temperature: Some(config.temperature),
                max_tokens: Some(config.max_tokens),
                ..ModelParameters::default()
            },
            timeout: Duration::from_secs(config.timeout_seconds),
            retry: RetryPolicy::from(config),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as the system message and `raw_command` as the user
    /// message. Blank replies come back as `Ok(None)`.
    pub async fn generate(&self, raw_command: &str, prompt: &str) -> Result<Option<String>, AIError> {
        let mut attempt = 0;
        loop {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: vec![ChatMessage::system(prompt), ChatMessage::user(raw_command)],
                parameters: Some(self.parameters.clone()),
            };

            let error = match tokio::time::timeout(self.timeout, self.client.chat_completion(request)).await {
                Ok(Ok(response)) => {
                    let content = response.message.content.trim();
                    debug!("AI reply after {} attempt(s): {} chars", attempt + 1, content.len());
                    return Ok((!content.is_empty()).then(|| content.to_string()));
                }
                Ok(Err(e)) => e,
                Err(_) => AIError::Timeout(self.timeout.as_millis() as u64),
            };

            if !error.is_retryable() {
                return Err(error);
            }

            match self.retry.next_delay(attempt) {
                Some(delay) => {
                    warn!(
                        "AI call attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(error),
            }
        }
    }

    /// Check if the AI service is available
    pub async fn health_check(&self) -> bool {
        self.client.health_check().await.unwrap_or(false)
    }
}

impl std::fmt::Debug for AiValidationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiValidationClient")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
