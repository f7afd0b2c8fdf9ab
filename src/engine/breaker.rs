//! Consecutive-failure circuit breaker guarding the AI tier.
//!
//! State lives in two atomics: the failure count and the time of the last
//! failure as a millisecond offset from breaker creation (0 means none).
//! Races between concurrent callers may let an extra call through while the
//! breaker is opening.

use crate::config::CircuitBreakerConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Observable breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerState {
    /// Calls flow normally
    Closed,
    /// Threshold reached inside the cool-down window; calls are skipped
    Open,
    /// Threshold reached but the window elapsed; the next call is a probe
    HalfOpen,
}

/// Point-in-time view for status output
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub state: BreakerState,
    pub consecutive_failures: u32,
    pub failure_threshold: u32,
    pub cooldown_seconds: u64,
    pub last_failure: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    cooldown: Duration,
    consecutive_failures: AtomicU32,
    last_failure_ms: AtomicU64,
    started: Instant,
    started_wall: DateTime<Utc>,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            cooldown,
            consecutive_failures: AtomicU32::new(0),
            last_failure_ms: AtomicU64::new(0),
            started: Instant::now(),
            started_wall: Utc::now(),
        }
    }

    pub fn from_config(config: &CircuitBreakerConfig) -> Self {
        Self::new(
            config.failure_threshold,
            Duration::from_secs(config.cooldown_seconds),
        )
    }

    /// Milliseconds since creation, never 0 so that 0 can mean "no failure"
    fn now_offset_ms(&self) -> u64 {
        (self.started.elapsed().as_millis() as u64).saturating_add(1)
    }

    fn since_last_failure(&self) -> Option<Duration> {
        match self.last_failure_ms.load(Ordering::Acquire) {
            0 => None,
            at => Some(Duration::from_millis(self.now_offset_ms().saturating_sub(at))),
        }
    }

    pub fn state(&self) -> BreakerState {
        if self.consecutive_failures.load(Ordering::Acquire) < self.failure_threshold {
            return BreakerState::Closed;
        }
        match self.since_last_failure() {
            Some(elapsed) if elapsed < self.cooldown => BreakerState::Open,
            _ => BreakerState::HalfOpen,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == BreakerState::Open
    }

    /// Whether the AI tier may be called right now (closed or probing)
    pub fn allows_request(&self) -> bool {
        !self.is_open()
    }

    pub fn record_success(&self) {
        let previous = self.consecutive_failures.swap(0, Ordering::AcqRel);
        if previous >= self.failure_threshold {
            info!("AI service recovered after {} consecutive failures, circuit closed", previous);
        }
    }

    pub fn record_failure(&self) {
        self.last_failure_ms
            .store(self.now_offset_ms(), Ordering::Release);
        let failures = self.consecutive_failures.fetch_add(1, Ordering::AcqRel) + 1;
        if failures == self.failure_threshold {
            warn!(
                "AI service failed {} consecutive times, circuit open for {:?}",
                failures, self.cooldown
            );
        } else if failures > self.failure_threshold {
            warn!("AI probe failed, circuit re-armed for {:?}", self.cooldown);
        }
    }

    pub fn failure_count(&self) -> u32 {
        self.consecutive_failures.load(Ordering::Acquire)
    }

    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn reset(&self) {
        self.consecutive_failures.store(0, Ordering::Release);
        self.last_failure_ms.store(0, Ordering::Release);
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let last_failure = match self.last_failure_ms.load(Ordering::Acquire) {
            0 => None,
            at => chrono::Duration::try_milliseconds(at.saturating_sub(1) as i64)
                .map(|offset| self.started_wall + offset),
        };
        BreakerSnapshot {
            state: self.state(),
            consecutive_failures: self.failure_count(),
            failure_threshold: self.failure_threshold,
            cooldown_seconds: self.cooldown.as_secs(),
            last_failure,
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::from_config(&CircuitBreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_at_threshold() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        assert_eq!(breaker.state(), BreakerState::Closed);

        breaker.record_failure();
        breaker.record_failure();
        assert!(breaker.allows_request());

        breaker.record_failure();
        assert!(breaker.is_open());
        assert!(!breaker.allows_request());
        assert_eq!(breaker.failure_count(), 3);
    }

    #[test]
    fn test_success_resets_count() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        breaker.record_failure();
        breaker.record_failure();
        breaker.record_success();

        assert_eq!(breaker.failure_count(), 0);
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn test_half_open_after_cooldown() {
        let breaker = CircuitBreaker::new(2, Duration::from_millis(30));
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(breaker.state(), BreakerState::HalfOpen);
        assert!(breaker.allows_request());

        // A failed probe re-arms the window
        breaker.record_failure();
        assert_eq!(breaker.state(), BreakerState::Open);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let breaker = CircuitBreaker::new(1, Duration::from_secs(60));
        assert!(breaker.snapshot().last_failure.is_none());

        let before = Utc::now() - chrono::Duration::seconds(1);
        breaker.record_failure();
        let snapshot = breaker.snapshot();
        assert_eq!(snapshot.state, BreakerState::Open);
        assert_eq!(snapshot.consecutive_failures, 1);
        assert!(snapshot.last_failure.is_some_and(|at| at >= before));

        breaker.reset();
        assert_eq!(breaker.state(), BreakerState::Closed);
        assert!(breaker.snapshot().last_failure.is_none());
    }

    #[test]
    fn test_zero_threshold_is_clamped() {
        let breaker = CircuitBreaker::new(0, Duration::from_secs(60));
        assert_eq!(breaker.failure_threshold(), 1);
        assert!(breaker.allows_request());
    }
}
