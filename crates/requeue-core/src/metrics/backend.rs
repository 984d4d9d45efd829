use std::sync::Arc;

/// Why the retry stage let an envelope through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// The attempt succeeded.
    Succeeded,
    /// The request method is not eligible for resubmission.
    MethodNotRetryable,
    /// The applicable policy never retries.
    RetryDisabled,
    /// The policy's attempt budget is spent.
    AttemptsExhausted,
}

impl PassReason {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            PassReason::Succeeded => "succeeded",
            PassReason::MethodNotRetryable => "method_not_retryable",
            PassReason::RetryDisabled => "retry_disabled",
            PassReason::AttemptsExhausted => "attempts_exhausted",
        }
    }
}

/// Backend metrics collection interface.
///
/// This trait abstracts metrics collection across different backends.
/// Implementations are injected into [`crate::RetryStage`] and called once per decision.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record a scheduled resubmission.
    ///
    /// # Arguments
    /// - `method`: HTTP method of the request
    /// - `attempt`: retry index being scheduled (1 for the first retry)
    /// - `delay_ms`: delay before the dispatch in milliseconds
    fn record_retry_scheduled(&self, method: &str, attempt: u32, delay_ms: u64);
    /// Record an envelope passed through without intervention.
    ///
    /// # Arguments
    /// - `reason`: why no retry was scheduled
    fn record_passthrough(&self, reason: PassReason);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[cfg(test)]
mod tests {
    use super::PassReason;

    #[test]
    fn labels_are_distinct() {
        let labels = [
            PassReason::Succeeded,
            PassReason::MethodNotRetryable,
            PassReason::RetryDisabled,
            PassReason::AttemptsExhausted,
        ]
        .map(|r| r.as_label());

        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
