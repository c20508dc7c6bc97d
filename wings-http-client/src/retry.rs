//! Retry configuration and the attempt loop driver.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{EvaluationError, Result};

/// Retry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::constant(3, Duration::from_millis(100))
    }
}

impl RetryConfig {
    /// Create a retry config with constant delay.
    ///
    /// A zero `delay` retries immediately.
    pub fn constant(max_attempts: u32, delay: Duration) -> Self {
        let backoff = if delay.is_zero() {
            BackoffStrategy::None
        } else {
            BackoffStrategy::Constant(delay)
        };
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Calculate delay after a given failed attempt (1-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay_for_attempt(attempt)
    }
}

/// Backoff strategy for retries.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Constant delay between retries.
    Constant(Duration),
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt.
    pub fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Constant(d) => *d,
        }
    }
}

/// Failure of a single attempt, tagged with whether retrying may help.
#[derive(Debug)]
pub enum AttemptError {
    /// Transient failure; the driver may try again.
    Retryable(EvaluationError),
    /// Definitive failure; stop immediately.
    Permanent(EvaluationError),
}

/// Run `operation` until it succeeds, fails permanently, or the attempt budget
/// is spent, waiting per `config` between attempts.
///
/// `cancel` is observed before every attempt, while an attempt is in flight
/// (the attempt future is dropped), and during the wait. Cancellation yields
/// [`EvaluationError::Cancelled`]. When the budget runs out the last attempt's
/// error is returned.
pub async fn retry<T, F, Fut>(
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = std::result::Result<T, AttemptError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(EvaluationError::Cancelled);
        }
        attempt += 1;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EvaluationError::Cancelled),
            outcome = operation(attempt) => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(AttemptError::Permanent(e)) => {
                debug!(attempt, error = %e, "Attempt failed permanently");
                return Err(e);
            }
            Err(AttemptError::Retryable(e)) => e,
        };

        if attempt >= max_attempts {
            warn!(attempts = attempt, error = %error, "Retry budget exhausted");
            return Err(error);
        }

        let delay = config.delay_for_attempt(attempt);
        debug!(
            attempt,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Retrying after transient failure"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(EvaluationError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
