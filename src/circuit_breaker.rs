//! # Circuit Breaker Module
//!
//! Circuit breaker for provider calls. When the vision or recipe provider
//! fails repeatedly, the breaker opens and requests fail fast until the
//! reset window elapses, giving the upstream service room to recover.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::provider_config::RecoveryConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure: Option<Instant>,
}

/// Circuit breaker guarding provider HTTP calls
///
/// # State Machine
///
/// - **Closed**: normal operation, calls pass through
/// - **Open**: failure threshold exceeded, calls fail fast
/// - **Reset**: after `circuit_breaker_reset_secs` the counter clears and
///   calls pass through again
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    threshold: u32,
    reset_after: Duration,
}

impl CircuitBreaker {
    /// Create a new circuit breaker from recovery settings
    pub fn new(config: &RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            threshold: config.circuit_breaker_threshold,
            reset_after: Duration::from_secs(config.circuit_breaker_reset_secs),
        }
    }

    /// Check whether the breaker is open and calls should fail fast
    ///
    /// Automatically resets to closed once the reset window has elapsed
    /// since the last recorded failure.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock().unwrap();

        if state.failure_count >= self.threshold {
            if let Some(last) = state.last_failure {
                if last.elapsed() < self.reset_after {
                    return true;
                }
                state.failure_count = 0;
                state.last_failure = None;
            }
        }
        false
    }

    /// Record a failed provider call
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap();
        state.failure_count += 1;
        state.last_failure = Some(Instant::now());
    }

    /// Record a successful provider call, closing the breaker
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap();
        state.failure_count = 0;
        state.last_failure = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(&RecoveryConfig {
            circuit_breaker_threshold: threshold,
            ..RecoveryConfig::default()
        })
    }

    #[test]
    fn test_starts_closed() {
        assert!(!breaker(3).is_open());
    }

    #[test]
    fn test_opens_after_threshold() {
        let cb = breaker(3);
        cb.record_failure();
        cb.record_failure();
        assert!(!cb.is_open());
        cb.record_failure();
        assert!(cb.is_open());
    }

    #[test]
    fn test_success_resets_counter() {
        let cb = breaker(2);
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert!(!cb.is_open());
    }
}
