//! Retry policy evaluation.
//!
//! [`evaluate`] maps a declarative [`RetryPolicy`] and the number of retries already performed
//! to a [`RetryDecision`]. It is pure apart from the injected random source used for jitter.
mod jitter;
pub use jitter::{jittered_ms, nominal_ms};

use std::{sync::Arc, time::Duration};

use rand::Rng;
use requeue_model::RetryPolicy;

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not resubmit.
    Stop,
    /// Resubmit after the given delay.
    RetryAfter(Duration),
}

impl RetryDecision {
    /// Delay before the next attempt, if a retry is allowed.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        match self {
            RetryDecision::Stop => None,
            RetryDecision::RetryAfter(d) => Some(*d),
        }
    }
}

/// Replaces the policy-computed delay; the policy still decides whether to retry.
///
/// Receives the applicable policy and the 0-based attempt index.
pub type DelayFn = Arc<dyn Fn(&RetryPolicy, u32) -> Duration + Send + Sync>;

/// Decide whether attempt `attempt` (retries already performed) may be retried, and after how long.
pub fn evaluate<R>(policy: &RetryPolicy, attempt: u32, rng: &mut R) -> RetryDecision
where
    R: Rng,
{
    match *policy {
        RetryPolicy::NoRetry => RetryDecision::Stop,
        RetryPolicy::Simple {
            delay_ms,
            max_attempts,
        } => {
            if attempt >= max_attempts {
                return RetryDecision::Stop;
            }
            RetryDecision::RetryAfter(Duration::from_millis(delay_ms))
        }
        RetryPolicy::ExponentialBackoff {
            delay_ms,
            max_attempts,
        } => {
            if attempt >= max_attempts {
                return RetryDecision::Stop;
            }
            RetryDecision::RetryAfter(Duration::from_millis(jittered_ms(delay_ms, attempt, rng)))
        }
    }
}

/// [`evaluate`] backed by the thread-local generator.
pub fn evaluate_with_thread_rng(policy: &RetryPolicy, attempt: u32) -> RetryDecision {
    evaluate(policy, attempt, &mut rand::thread_rng())
}
