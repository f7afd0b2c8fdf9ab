//! Testing utilities and common helpers for the correction engine.

use std::sync::Arc;
use std::time::Duration;

pub mod mocks;

pub use mocks::{MockAIClient, MockReply};

use crate::ai::{AiValidationClient, RetryPolicy};
use crate::config::Config;
use crate::engine::CommandEngine;

/// Config with a short breaker cool-down and no retry backoff
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.ai.max_retries = 0;
    config.ai.backoff_base_ms = 1;
    config.ai.backoff_max_ms = 1;
    config.circuit_breaker.cooldown_seconds = 60;
    config
}

/// Engine backed by `mock` with built-in metadata and no retries
pub fn engine_with(mock: &MockAIClient, config: &Config) -> CommandEngine {
    let client = AiValidationClient::from_config(Arc::new(mock.clone()), &config.ai)
        .with_retry_policy(RetryPolicy::none())
        .with_timeout(Duration::from_secs(2));
    CommandEngine::from_config(config, client)
}

/// Logging utilities for tests
pub struct TestLogging;

impl TestLogging {
    /// Initialize tracing for async tests
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }
}
