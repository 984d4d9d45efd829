use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use rand::rngs::StdRng;
use requeue_model::{HttpMethod, HttpRequest, RetryPolicy};
use tracing::{debug, instrument, trace};

use crate::{
    config::RetryConfig,
    envelope::InboundEnvelope,
    error::CoreResult,
    metrics::{MetricsHandle, PassReason, noop_metrics},
    policy::{DelayFn, RetryDecision, evaluate, evaluate_with_thread_rng},
    scheduler::SchedulerHandle,
    stage::Stage,
};

/// Resubmits failed requests according to their retry policy.
///
/// For every failed attempt of a retryable method the stage consults the request's policy
/// (or the configured default). When another attempt is allowed it schedules a dispatch of
/// the same request with `retry_count + 1` and returns an aborted copy of the envelope, so
/// the failure never reaches downstream stages. In every other case the envelope is returned
/// as is.
///
/// The stage keeps no per-request state: everything it needs travels in the envelope.
pub struct RetryStage {
    scheduler: SchedulerHandle,
    config: RetryConfig,
    delay_fn: Option<DelayFn>,
    rng: Option<Mutex<StdRng>>,
    metrics: MetricsHandle,
}

impl RetryStage {
    /// Stage with the default configuration.
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self::build(RetryConfig::default(), scheduler)
    }

    /// Stage with an explicit configuration.
    ///
    /// Fails with [`CoreError::Config`](crate::CoreError::Config) when the configuration lists a
    /// method that is not safe to resubmit.
    pub fn from_config(config: RetryConfig, scheduler: SchedulerHandle) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config, scheduler))
    }

    fn build(config: RetryConfig, scheduler: SchedulerHandle) -> Self {
        Self {
            scheduler,
            config,
            delay_fn: None,
            rng: None,
            metrics: noop_metrics(),
        }
    }

    /// Override the delay computed by the policy.
    ///
    /// The policy still decides *whether* to retry; `f` only decides *when*.
    pub fn with_delay_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&RetryPolicy, u32) -> Duration + Send + Sync + 'static,
    {
        self.delay_fn = Some(Arc::new(f));
        self
    }

    /// Draw jitter from `rng` instead of the thread-local generator.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Some(Mutex::new(rng));
        self
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Decide what happens to the outcome of one attempt.
    ///
    /// Steps, first match wins:
    /// 1. success: pass through;
    /// 2. method not retryable: pass through;
    /// 3. policy (explicit or default) denies attempt `retry_count`: pass through;
    /// 4. otherwise schedule the next attempt and return an aborted copy.
    #[instrument(
        level = "debug",
        skip(self, inbound),
        fields(
            path = %inbound.original_request.innermost().path,
            method = %inbound.original_request.innermost().method,
        )
    )]
    pub fn decide(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
        if !inbound.outcome.is_error() {
            self.metrics.record_passthrough(PassReason::Succeeded);
            return inbound;
        }

        let request = inbound.original_request.innermost();
        if !self.config.is_retryable(request.method) {
            trace!("method not retryable, failure passes through");
            self.metrics.record_passthrough(PassReason::MethodNotRetryable);
            return inbound;
        }

        let policy = request
            .policy()
            .copied()
            .unwrap_or(self.config.default_policy);
        let attempt = request.retry_count();

        let delay = match self.evaluate(&policy, attempt) {
            RetryDecision::Stop => {
                let reason = match policy {
                    RetryPolicy::NoRetry => PassReason::RetryDisabled,
                    _ => PassReason::AttemptsExhausted,
                };
                debug!(
                    policy = policy.kind(),
                    attempt,
                    max_attempts = policy.max_attempts(),
                    reason = reason.as_label(),
                    "no retry"
                );
                self.metrics.record_passthrough(reason);
                return inbound;
            }
            RetryDecision::RetryAfter(d) => match &self.delay_fn {
                Some(f) => f(&policy, attempt),
                None => d,
            },
        };

        self.schedule_retry(&inbound, request.method, delay);
        Arc::new(inbound.aborted())
    }

    fn evaluate(&self, policy: &RetryPolicy, attempt: u32) -> RetryDecision {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                evaluate(policy, attempt, &mut *rng)
            }
            None => evaluate_with_thread_rng(policy, attempt),
        }
    }

    fn schedule_retry(&self, inbound: &InboundEnvelope, method: HttpMethod, delay: Duration) {
        let next = inbound
            .original_request
            .map_innermost(HttpRequest::next_attempt);
        let attempt = next.retry_count();
        let store = Arc::clone(&inbound.store);

        self.scheduler
            .schedule(delay, Box::new(move || store.dispatch(next)));

        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        debug!(attempt, delay_ms, "retry scheduled");
        self.metrics
            .record_retry_scheduled(method.as_str(), attempt, delay_ms);
    }
}

impl Stage for RetryStage {
    fn name(&self) -> &'static str {
        "retry-on-failure"
    }

    fn process(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
        self.decide(inbound)
    }
}

impl fmt::Debug for RetryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryStage")
            .field("config", &self.config)
            .field("delay_fn", &self.delay_fn.as_ref().map(|_| "<fn>"))
            .field("seeded_rng", &self.rng.is_some())
            .finish()
    }
}
