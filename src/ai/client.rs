//! Ollama Client Implementation
//!
//! This module provides a client for interacting with Ollama local LLM instances.

use super::{AIClient, AIError, ChatMessage, ChatRequest, ChatResponse, MessageRole, ModelParameters, TokenUsage};
use crate::config::AIConfig;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Ollama client configuration
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&AIConfig> for OllamaConfig {
    fn from(config: &AIConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }
}

/// Ollama HTTP client for local LLM interactions
#[derive(Debug)]
pub struct OllamaClient {
    client: Client,
    config: OllamaConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    options: HashMap<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<OllamaChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    done: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_eval_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eval_count: Option<u32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: OllamaConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::ConfigurationError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Convert our ChatMessage to Ollama format
    fn convert_message(message: &ChatMessage) -> OllamaChatMessage {
        let role = match message.role {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };

        OllamaChatMessage {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }

    /// Convert model parameters to Ollama options
    fn convert_parameters(params: &ModelParameters) -> HashMap<String, Value> {
        let mut options = HashMap::new();

        if let Some(temp) = params.temperature {
            options.insert("temperature".to_string(), Value::from(temp));
        }

        if let Some(top_p) = params.top_p {
            options.insert("top_p".to_string(), Value::from(top_p));
        }

        if let Some(max_tokens) = params.max_tokens {
            options.insert("num_predict".to_string(), Value::from(max_tokens));
        }

        if let Some(stop) = &params.stop {
            options.insert("stop".to_string(), Value::from(stop.clone()));
        }

        options
    }

    /// Handle HTTP response errors
    async fn handle_response_error(response: Response) -> AIError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => AIError::ModelNotFound(text),
            429 => AIError::RateLimitExceeded,
            500..=599 => AIError::ServiceUnavailable(format!("Server error: {}", text)),
            _ => AIError::NetworkError(format!("HTTP {}: {}", status, text)),
        }
    }

    fn map_send_error(&self, error: reqwest::Error) -> AIError {
        if error.is_timeout() {
            AIError::Timeout(self.config.timeout.as_millis() as u64)
        } else {
            AIError::NetworkError(error.to_string())
        }
    }
}

#[async_trait]
impl AIClient for OllamaClient {
    async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse, AIError> {
        let url = format!("{}/api/chat", self.config.endpoint);

        let messages: Vec<OllamaChatMessage> = request.messages
            .iter()
            .map(Self::convert_message)
            .collect();

        let options = request.parameters
            .as_ref()
            .map(Self::convert_parameters)
            .unwrap_or_default();

        let ollama_request = OllamaChatRequest {
            model: request.model.clone(),
            messages,
            stream: Some(false),
            options,
        };

        let response = self.client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(Self::handle_response_error(response).await);
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AIError::ParseError(e.to_string()))?;

        let message = if let Some(msg) = ollama_response.message {
            ChatMessage::assistant(msg.content)
        } else if let Some(content) = ollama_response.response {
            ChatMessage::assistant(content)
        } else {
            return Err(AIError::ParseError("No message content in response".to_string()));
        };

        let usage = if let (Some(prompt_tokens), Some(completion_tokens)) = (
            ollama_response.prompt_eval_count.map(|c| c as usize),
            ollama_response.eval_count.map(|c| c as usize),
        ) {
            Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            })
        } else {
            None
        };

        Ok(ChatResponse {
            message,
            model: request.model,
            usage,
        })
    }

    async fn health_check(&self) -> Result<bool, AIError> {
        let url = format!("{}/api/tags", self.config.endpoint);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}
