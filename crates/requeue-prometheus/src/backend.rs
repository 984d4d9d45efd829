use std::sync::Arc;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry, proto::MetricFamily};

use requeue_core::{MetricsBackend, PassReason};

/// Prometheus metrics backend for the retry stage.
///
/// Implements [`MetricsBackend`] and exposes prometheus metrics that can be scraped via HTTP endpoint.
///
/// ## Metrics
/// - `requeue_retries_scheduled_total{method}` - Counter of scheduled resubmissions
/// - `requeue_retry_delay_seconds{method}` - Histogram of scheduled delays
/// - `requeue_retry_attempt{method}` - Histogram of the retry index being scheduled
/// - `requeue_passthrough_total{reason}` - Counter of envelopes let through untouched
///
/// ## Label cardinality
/// All labels are bounded (low cardinality):
/// - `method`: HTTP method names
/// - `reason`: "succeeded", "method_not_retryable", "retry_disabled", "attempts_exhausted"
#[derive(Clone)]
pub struct PrometheusMetrics {
    retries_scheduled: CounterVec,
    retry_delay: HistogramVec,
    retry_attempt: HistogramVec,
    passthrough: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a new prometheus metrics backend with custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let retries_scheduled = CounterVec::new(
            Opts::new("retries_scheduled_total", "Total number of scheduled retries")
                .namespace("requeue"),
            &["method"],
        )?;
        registry.register(Box::new(retries_scheduled.clone()))?;

        let retry_delay = HistogramVec::new(
            HistogramOpts::new("retry_delay_seconds", "Delay before a scheduled retry in seconds")
                .namespace("requeue")
                .buckets(vec![0.1, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0]),
            &["method"],
        )?;
        registry.register(Box::new(retry_delay.clone()))?;

        let retry_attempt = HistogramVec::new(
            HistogramOpts::new("retry_attempt", "Retry index of scheduled retries")
                .namespace("requeue")
                .buckets(vec![1.0, 2.0, 3.0, 5.0, 8.0]),
            &["method"],
        )?;
        registry.register(Box::new(retry_attempt.clone()))?;

        let passthrough = CounterVec::new(
            Opts::new(
                "passthrough_total",
                "Total envelopes passed through without a retry",
            )
            .namespace("requeue"),
            &["reason"],
        )?;
        registry.register(Box::new(passthrough.clone()))?;

        Ok(Self {
            retries_scheduled,
            retry_delay,
            retry_attempt,
            passthrough,
            registry,
        })
    }

    /// Create a new prometheus metrics backend with default registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    ///
    /// Use this to implement `/metrics` HTTP endpoint.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Get reference to underlying prometheus registry.
    ///
    /// Useful for registering custom metrics alongside the retry metrics.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_retry_scheduled(&self, method: &str, attempt: u32, delay_ms: u64) {
        self.retries_scheduled.with_label_values(&[method]).inc();
        self.retry_delay
            .with_label_values(&[method])
            .observe(delay_ms as f64 / 1000.0);
        self.retry_attempt
            .with_label_values(&[method])
            .observe(f64::from(attempt));
    }

    fn record_passthrough(&self, reason: PassReason) {
        self.passthrough
            .with_label_values(&[reason.as_label()])
            .inc();
    }
}
