//! Metrics collection abstraction for the retry pipeline.
//!
//! This module provides a backend interface for observing retry decisions.
//! Metrics backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected into [`crate::RetryStage`].
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, PassReason};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
