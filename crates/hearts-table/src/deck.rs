//! Retry wrapper around a [`DeckSource`].

use hearts_core::error::DealingError;
use hearts_core::game::deal::DeckSource;
use hearts_core::model::deck::Deck;
use std::thread;
use std::time::Duration;
use tracing::{Level, event};

/// Attempts per deal and the doubling backoff between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub const fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    /// Delay before attempt `attempt + 1`, zero-based.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

pub struct RetryingSource<'a> {
    inner: &'a dyn DeckSource,
    policy: RetryPolicy,
}

impl<'a> RetryingSource<'a> {
    pub fn new(inner: &'a dyn DeckSource, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl DeckSource for RetryingSource<'_> {
    fn acquire(&self, seed: Option<u64>) -> Result<Deck, DealingError> {
        let attempts = self.policy.attempts.max(1);
        let mut last = String::new();
        for attempt in 0..attempts {
            match self.inner.acquire(seed) {
                Ok(deck) => return Ok(deck),
                Err(err) => {
                    event!(
                        target: "hearts_table::deck",
                        Level::WARN,
                        source = self.inner.name(),
                        attempt = attempt + 1,
                        of = attempts,
                        error = %err,
                        "deck acquisition failed"
                    );
                    last = err.to_string();
                }
            }
            if attempt + 1 < attempts {
                let delay = self.policy.delay_after(attempt);
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
            }
        }
        Err(DealingError::Exhausted { attempts, last })
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FlakySource;
    use super::{RetryPolicy, RetryingSource};
    use hearts_core::error::DealingError;
    use hearts_core::game::deal::DeckSource;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    #[test]
    fn recovers_within_attempts() {
        let flaky = FlakySource::new(2);
        let source = RetryingSource::new(&flaky, RetryPolicy::immediate(3));
        assert!(source.acquire(Some(1)).is_ok());
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn gives_up_after_attempts() {
        let flaky = FlakySource::new(10);
        let source = RetryingSource::new(&flaky, RetryPolicy::immediate(2));
        let err = source.acquire(None).unwrap_err();
        assert!(matches!(err, DealingError::Exhausted { attempts: 2, .. }));
        assert_eq!(flaky.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let policy = RetryPolicy {
            attempts: 5,
            backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(35),
        };
        assert_eq!(policy.delay_after(0), Duration::from_millis(10));
        assert_eq!(policy.delay_after(1), Duration::from_millis(20));
        assert_eq!(policy.delay_after(2), Duration::from_millis(35));
        assert_eq!(policy.delay_after(40), Duration::from_millis(35));
    }
}
