use serde::{Deserialize, Serialize};

use requeue_model::{HttpMethod, RetryPolicy};

use crate::error::{CoreError, CoreResult};

/// Retry stage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryConfig {
    /// Policy applied when a request carries no `options.whenFailing`.
    pub default_policy: RetryPolicy,
    /// Methods eligible for resubmission. Requests with any other method fail through.
    pub retry_methods: Vec<HttpMethod>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            default_policy: RetryPolicy::default(),
            retry_methods: vec![HttpMethod::Get],
        }
    }
}

impl RetryConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    ///
    /// The result is [validated](RetryConfig::validate).
    ///
    /// # Examples
    /// ```rust
    /// use requeue_core::RetryConfig;
    /// use requeue_model::RetryPolicy;
    ///
    /// let cfg = RetryConfig::from_json(r#"{"defaultPolicy":{"kind":"noRetry"}}"#).unwrap();
    /// assert_eq!(cfg.default_policy, RetryPolicy::NoRetry);
    /// ```
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        let cfg: Self =
            serde_json::from_str(raw).map_err(|e| CoreError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects methods that are not safe to resubmit.
    ///
    /// Only `GET`, `HEAD` and `OPTIONS` may be retried; a repeated `POST` or `DELETE` could apply
    /// its effect twice.
    pub fn validate(&self) -> CoreResult<()> {
        match self.retry_methods.iter().find(|m| !m.is_safe()) {
            Some(method) => Err(CoreError::Config(format!(
                "method {method} is not idempotent and cannot be retried"
            ))),
            None => Ok(()),
        }
    }

    /// Returns `true` if requests with `method` may be resubmitted.
    pub fn is_retryable(&self, method: HttpMethod) -> bool {
        self.retry_methods.contains(&method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = RetryConfig::default();

        assert_eq!(cfg.default_policy, RetryPolicy::simple_retry(1_000, 3));
        assert_eq!(cfg.retry_methods, vec![HttpMethod::Get]);
        assert!(cfg.is_retryable(HttpMethod::Get));
        assert!(!cfg.is_retryable(HttpMethod::Post));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = RetryConfig::from_json("{}").unwrap();
        assert_eq!(cfg, RetryConfig::default());
    }

    #[test]
    fn partial_deserialization() {
        let cfg = RetryConfig::from_json(
            r#"{
                "defaultPolicy": { "kind": "exponentialBackoff", "delayMs": 200 },
                "retryMethods": ["GET", "head"]
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.default_policy, RetryPolicy::exponential_backoff(200, 3));
        assert!(cfg.is_retryable(HttpMethod::Head));
    }

    #[test]
    fn invalid_document_is_config_error() {
        let err = RetryConfig::from_json(r#"{"retryMethods":["FETCH"]}"#).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn unsafe_methods_are_rejected() {
        for raw in [
            r#"{"retryMethods":["POST"]}"#,
            r#"{"retryMethods":["GET","DELETE"]}"#,
            r#"{"retryMethods":["put"]}"#,
        ] {
            let err = RetryConfig::from_json(raw).unwrap_err();
            assert!(matches!(err, CoreError::Config(_)), "expected config error for {raw}");
        }
    }

    #[test]
    fn validate_catches_hand_built_config() {
        let cfg = RetryConfig {
            retry_methods: vec![HttpMethod::Get, HttpMethod::Patch],
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("PATCH"));

        let safe = RetryConfig {
            retry_methods: vec![HttpMethod::Get, HttpMethod::Head, HttpMethod::Options],
            ..Default::default()
        };
        assert!(safe.validate().is_ok());
    }
}
