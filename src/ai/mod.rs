//! AI Integration Module
//!
//! This module provides the chat-completion client used to escalate command
//! validation to a language model, with primary support for local Ollama
//! instances, plus the timeout/retry wrapper and reply parsing the engine uses.

pub mod client;
pub mod response;
pub mod retry;
pub mod validation_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::{OllamaClient, OllamaConfig};
pub use response::{parse_token_reply, parse_verdict, strip_code_fences, AiVerdict, VerdictType};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use validation_client::AiValidationClient;

/// Model parameters for generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<usize>,
    pub stop: Option<Vec<String>>,
}

/// Represents a chat message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Role of a message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Request for chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub parameters: Option<ModelParameters>,
}

/// Response from chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Trait for AI clients that can answer chat-completion requests
#[async_trait]
pub trait AIClient: Send + Sync {
    /// Send a chat completion request
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, AIError>;

    /// Check if the AI service is available
    async fn health_check(&self) -> Result<bool, AIError>;
}

/// Errors that can occur when working with AI services
#[derive(Debug, Clone, thiserror::Error)]
pub enum AIError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AIError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AIError::ModelNotFound(_) | AIError::ConfigurationError(_)
        )
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: Some(0.1),
            top_p: Some(0.9),
            max_tokens: Some(256),
            stop: None,
        }
    }
}

impl ChatMessage {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
