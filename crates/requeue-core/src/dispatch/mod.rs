//! Re-entry point for resubmitted requests.
//!
//! The issuing collaborator implements [`Dispatcher`] so that a request handed back by the retry
//! stage goes through the same submission path as the original.
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use requeue_model::Request;
use tracing::trace;

/// Accepts requests for (re)submission.
///
/// Implementations serialize their own mutations; the retry stage calls `dispatch` from timer callbacks.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, request: Request);
}

/// Shared handle to a dispatcher, carried by every envelope.
pub type DispatchHandle = Arc<dyn Dispatcher>;

/// Dispatcher that keeps every request it receives.
#[derive(Default)]
pub struct RecordingDispatcher {
    requests: Mutex<Vec<Request>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder already wrapped in an [`Arc`].
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of dispatched requests.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Most recently dispatched request.
    pub fn last(&self) -> Option<Request> {
        self.lock().last().cloned()
    }

    /// All dispatched requests in dispatch order.
    pub fn requests(&self) -> Vec<Request> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Request>> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, request: Request) {
        trace!(path = %request.innermost().path, retry = request.retry_count(), "request recorded");
        self.lock().push(request);
    }
}

impl fmt::Debug for RecordingDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingDispatcher")
            .field("count", &self.count())
            .finish()
    }
}
