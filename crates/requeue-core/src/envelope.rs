//! Per-attempt record flowing through the pipeline.
use std::{fmt, sync::Arc};

use requeue_model::Request;

use crate::dispatch::DispatchHandle;

/// Result of one attempt: response data or an opaque failure payload, never both.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Data(serde_json::Value),
    Error(serde_json::Value),
}

impl Outcome {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

/// Outcome of a completed attempt together with the request that produced it.
///
/// `store` is the dispatcher used to resubmit the request. `should_abort` is the abort marker:
/// once set, the outcome must not propagate past the stage that set it.
#[derive(Clone)]
pub struct InboundEnvelope {
    pub original_request: Request,
    pub outcome: Outcome,
    pub store: DispatchHandle,
    pub should_abort: bool,
}

impl InboundEnvelope {
    /// Envelope for a successful attempt.
    pub fn success(
        original_request: Request,
        data: serde_json::Value,
        store: DispatchHandle,
    ) -> Self {
        Self {
            original_request,
            outcome: Outcome::Data(data),
            store,
            should_abort: false,
        }
    }

    /// Envelope for a failed attempt.
    pub fn failure(
        original_request: Request,
        error: serde_json::Value,
        store: DispatchHandle,
    ) -> Self {
        Self {
            original_request,
            outcome: Outcome::Error(error),
            store,
            should_abort: false,
        }
    }

    /// Shorthand wrapping the envelope into an [`Arc`] for pipeline use.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Response data, present on success.
    pub fn next_data(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            Outcome::Data(v) => Some(v),
            Outcome::Error(_) => None,
        }
    }

    /// Failure payload, present on failure.
    pub fn next_error(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            Outcome::Error(v) => Some(v),
            Outcome::Data(_) => None,
        }
    }

    /// Copy of this envelope carrying the abort marker. `self` is left untouched.
    pub fn aborted(&self) -> Self {
        Self {
            should_abort: true,
            ..self.clone()
        }
    }
}

impl fmt::Debug for InboundEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InboundEnvelope")
            .field("original_request", &self.original_request)
            .field("outcome", &self.outcome)
            .field("store", &"<dispatcher>")
            .field("should_abort", &self.should_abort)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use requeue_model::HttpRequest;
    use serde_json::json;

    use super::*;
    use crate::dispatch::RecordingDispatcher;

    #[test]
    fn exactly_one_of_data_or_error() {
        let store = RecordingDispatcher::shared();
        let ok = InboundEnvelope::success(HttpRequest::get("/").into(), json!(1), store.clone());
        let err = InboundEnvelope::failure(HttpRequest::get("/").into(), json!("boom"), store);

        assert_eq!(ok.next_data(), Some(&json!(1)));
        assert!(ok.next_error().is_none());
        assert!(!ok.outcome.is_error());

        assert_eq!(err.next_error(), Some(&json!("boom")));
        assert!(err.next_data().is_none());
        assert!(err.outcome.is_error());
    }

    #[test]
    fn aborted_copies_without_mutating_source() {
        let store = RecordingDispatcher::shared();
        let env = InboundEnvelope::failure(HttpRequest::get("/sites").into(), json!({}), store);

        let aborted = env.aborted();

        assert!(aborted.should_abort);
        assert!(!env.should_abort);
        assert_eq!(aborted.original_request, env.original_request);
        assert_eq!(aborted.outcome, env.outcome);
        assert!(Arc::ptr_eq(&aborted.store, &env.store));
    }
}
