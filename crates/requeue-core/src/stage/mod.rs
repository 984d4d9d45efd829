//! Middleware stages of the inbound pipeline.
//!
//! Each stage sees the envelope produced by the previous one and either returns it untouched,
//! returns a modified copy, or marks it aborted to stop propagation.
mod retry;
pub use retry::RetryStage;

use std::sync::Arc;

use crate::envelope::InboundEnvelope;

/// One step of the inbound pipeline.
///
/// A stage must not mutate the envelope it receives: to change anything it returns a new envelope.
/// Returning the same [`Arc`] means "pass through".
pub trait Stage: Send + Sync {
    /// Stage name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Inspect the envelope of a completed attempt.
    fn process(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope>;
}
