use crate::metrics::backend::{MetricsBackend, PassReason};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_retry_scheduled(&self, _: &str, _: u32, _: u64) {}

    #[inline(always)]
    fn record_passthrough(&self, _: PassReason) {}
}
