//! Retry policy with deterministic backoff for AI calls

use crate::config::AIConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: usize,
    pub strategy: BackoffStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackoffStrategy {
    Fixed { delay_ms: u64 },
    Exponential { base_ms: u64, factor: u32, max_ms: u64 },
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            strategy: BackoffStrategy::Fixed { delay_ms: 0 },
        }
    }

    /// Delay before retry number `attempt` (0-based), or `None` once retries are exhausted
    pub fn next_delay(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.max_retries {
            return None;
        }
        let d = match self.strategy {
            BackoffStrategy::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            BackoffStrategy::Exponential { base_ms, factor, max_ms } => {
                let pow = factor.saturating_pow(attempt as u32).max(1);
                let ms = (base_ms.saturating_mul(pow as u64)).min(max_ms);
                Duration::from_millis(ms)
            }
        };
        Some(d)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            strategy: BackoffStrategy::Exponential { base_ms: 1_000, factor: 2, max_ms: 8_000 },
        }
    }
}

impl From<&AIConfig> for RetryPolicy {
    fn from(config: &AIConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            strategy: BackoffStrategy::Exponential {
                base_ms: config.backoff_base_ms,
                factor: config.backoff_factor,
                max_ms: config.backoff_max_ms,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_policy_exponential_backoff_caps() {
        let policy = RetryPolicy {
            max_retries: 5,
            strategy: BackoffStrategy::Exponential { base_ms: 1_000, factor: 2, max_ms: 5_000 },
        };
        let delays: Vec<u64> = (0..5)
            .map(|attempt| policy.next_delay(attempt).unwrap().as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![1_000, 2_000, 4_000, 5_000, 5_000]);
        assert!(policy.next_delay(5).is_none());
    }

    #[test]
    fn default_policy_starts_at_one_second() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.next_delay(0), Some(Duration::from_secs(1)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.next_delay(3), None);
    }

    #[test]
    fn none_policy_never_retries() {
        assert_eq!(RetryPolicy::none().next_delay(0), None);
    }
}
