use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::domain::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_MS};
use crate::error::{ModelError, ModelResult};

/// Declares whether, and how, a failed request is resubmitted.
///
/// Carried on a request under `options.whenFailing`; when absent the retry stage falls back to its configured default.
/// The model only describes the policy. Delay computation lives in the core layer.
///
/// Policies:
/// - `NoRetry`: never resubmit.
/// - `Simple`: resubmit after a fixed `delay_ms`, at most `max_attempts` times.
/// - `ExponentialBackoff`: resubmit after a delay that doubles with every attempt (plus jitter), at most `max_attempts` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RetryPolicy {
    /// Failures are never retried.
    NoRetry,
    /// Fixed delay between attempts.
    Simple {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },
    /// Delay grows geometrically with the attempt index.
    ExponentialBackoff {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },
}

fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl RetryPolicy {
    /// Never retry.
    pub const fn no_retry() -> Self {
        RetryPolicy::NoRetry
    }

    /// Retry after a fixed delay, at most `max_attempts` times.
    pub const fn simple_retry(delay_ms: u64, max_attempts: u32) -> Self {
        RetryPolicy::Simple {
            delay_ms,
            max_attempts,
        }
    }

    /// Retry with exponentially growing delays, at most `max_attempts` times.
    pub const fn exponential_backoff(delay_ms: u64, max_attempts: u32) -> Self {
        RetryPolicy::ExponentialBackoff {
            delay_ms,
            max_attempts,
        }
    }

    /// Returns the policy kind as a static string.
    pub fn kind(&self) -> &'static str {
        match self {
            RetryPolicy::NoRetry => "noRetry",
            RetryPolicy::Simple { .. } => "simple",
            RetryPolicy::ExponentialBackoff { .. } => "exponentialBackoff",
        }
    }

    /// Maximum number of retries allowed by this policy.
    pub fn max_attempts(&self) -> u32 {
        match self {
            RetryPolicy::NoRetry => 0,
            RetryPolicy::Simple { max_attempts, .. }
            | RetryPolicy::ExponentialBackoff { max_attempts, .. } => *max_attempts,
        }
    }
}

/// Built-in default: fixed 1s delay, three attempts.
impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::simple_retry(DEFAULT_RETRY_DELAY_MS, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Parses a policy kind name into the variant with default parameters.
impl FromStr for RetryPolicy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noretry" | "no-retry" | "never" | "none" => Ok(RetryPolicy::NoRetry),
            "simple" | "fixed" => Ok(RetryPolicy::default()),
            "exponentialbackoff" | "exponential" | "backoff" => Ok(
                RetryPolicy::exponential_backoff(DEFAULT_RETRY_DELAY_MS, DEFAULT_MAX_ATTEMPTS),
            ),
            other => Err(ModelError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Decodes an optional policy, treating any malformed value as absent.
pub(crate) fn lenient_policy<'de, D>(deserializer: D) -> Result<Option<RetryPolicy>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}
