//! Mock objects and test doubles for the correction engine.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ai::{AIClient, AIError, ChatMessage, ChatRequest, ChatResponse, MessageRole};

/// One scripted answer of the mock AI client
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(AIError),
}

/// Mock AI client with scripted replies, failures and delays
#[derive(Debug, Clone)]
pub struct MockAIClient {
    pub scripted: Arc<Mutex<VecDeque<MockReply>>>,
    pub fallback_reply: MockReply,
    pub received: Arc<Mutex<Vec<ChatRequest>>>,
    pub response_delay: Duration,
    pub healthy: bool,
}

impl MockAIClient {
    /// Always answers `text`
    pub fn replying(text: &str) -> Self {
        Self {
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            fallback_reply: MockReply::Text(text.to_string()),
            received: Arc::new(Mutex::new(Vec::new())),
            response_delay: Duration::ZERO,
            healthy: true,
        }
    }

    /// Always fails with a service-unavailable error
    pub fn failing() -> Self {
        let mut mock = Self::replying("");
        mock.fallback_reply =
            MockReply::Fail(AIError::ServiceUnavailable("Mock service down".to_string()));
        mock.healthy = false;
        mock
    }

    /// Answer `reply` once before falling back to the default behaviour
    pub fn then(self, reply: MockReply) -> Self {
        self.scripted.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    /// System prompts of every request received so far
    pub fn system_prompts(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.messages.iter().find(|m| m.role == MessageRole::System))
            .map(|m| m.content.clone())
            .collect()
    }
}

#[async_trait]
impl AIClient for MockAIClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, AIError> {
        let model = request.model.clone();
        self.received.lock().unwrap().push(request);

        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }

        let reply = self
            .scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(ChatResponse {
                message: ChatMessage::assistant(text),
                model,
                usage: None,
            }),
            MockReply::Fail(error) => Err(error),
        }
    }

    async fn health_check(&self) -> Result<bool, AIError> {
        Ok(self.healthy)
    }
}
