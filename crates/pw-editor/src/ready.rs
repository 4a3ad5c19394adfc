//! Bounded retry for work that needs a mounted rendering surface.
//!
//! The first attempt happens immediately; while the surface is missing the
//! work is re-armed every `retry_interval_ms`, up to `max_attempts`. After
//! that the caller proceeds degraded until the next `ready` signal resets the
//! counter.

use crate::config::ReadyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// Surface is there; run the work now.
    Run,
    /// Try again at `next_due`.
    Retry,
    /// Attempts exhausted; skip the work.
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct ReadyRetry {
    config: ReadyConfig,
    attempts: u32,
    next_due: Option<f64>,
    exhausted: bool,
}

impl ReadyRetry {
    pub fn new(config: ReadyConfig) -> Self {
        Self {
            config,
            attempts: 0,
            next_due: None,
            exhausted: false,
        }
    }

    /// Record an attempt given whether the surface is mounted.
    pub fn attempt(&mut self, surface_ready: bool, now_ms: f64) -> ReadyOutcome {
        if surface_ready {
            self.reset();
            return ReadyOutcome::Run;
        }
        if self.exhausted {
            return ReadyOutcome::GiveUp;
        }
        self.attempts += 1;
        if self.attempts >= self.config.max_attempts {
            log::warn!(
                "rendering surface still detached after {} attempts; continuing without overlays",
                self.attempts
            );
            self.exhausted = true;
            self.next_due = None;
            return ReadyOutcome::GiveUp;
        }
        self.next_due = Some(now_ms + self.config.retry_interval_ms);
        ReadyOutcome::Retry
    }

    /// `true` when a scheduled retry is due.
    pub fn is_due(&self, now_ms: f64) -> bool {
        self.next_due.is_some_and(|due| now_ms >= due)
    }

    pub fn next_due(&self) -> Option<f64> {
        self.next_due
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
        self.next_due = None;
        self.exhausted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_immediately_when_mounted() {
        let mut retry = ReadyRetry::new(ReadyConfig::default());
        assert_eq!(retry.attempt(true, 0.0), ReadyOutcome::Run);
        assert_eq!(retry.next_due(), None);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut retry = ReadyRetry::new(ReadyConfig {
            max_attempts: 3,
            retry_interval_ms: 100.0,
        });
        assert_eq!(retry.attempt(false, 0.0), ReadyOutcome::Retry);
        assert!(retry.is_due(100.0));
        assert_eq!(retry.attempt(false, 100.0), ReadyOutcome::Retry);
        assert_eq!(retry.attempt(false, 200.0), ReadyOutcome::GiveUp);
        assert!(retry.is_exhausted());
        assert_eq!(retry.attempt(false, 300.0), ReadyOutcome::GiveUp);
    }

    #[test]
    fn mounting_resets_the_budget() {
        let mut retry = ReadyRetry::new(ReadyConfig {
            max_attempts: 2,
            retry_interval_ms: 10.0,
        });
        retry.attempt(false, 0.0);
        retry.attempt(false, 10.0);
        assert!(retry.is_exhausted());
        assert_eq!(retry.attempt(true, 20.0), ReadyOutcome::Run);
        assert!(!retry.is_exhausted());
    }
}
