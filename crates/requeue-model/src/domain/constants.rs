//! Common model-level constants.
//!
//! Defaults applied when a request or a retry policy omits a value.

/// API version used when a request does not name one.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Delay between retries for the built-in default policy (in milliseconds).
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Number of retries allowed by the built-in default policy.
///
/// Also used when a serialized `simple` / `exponentialBackoff` policy omits `maxAttempts`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
