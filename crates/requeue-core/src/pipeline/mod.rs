//! Inbound pipeline that runs completed attempts through a chain of stages.
//!
//! Stages run in registration order. As soon as a stage returns an envelope carrying the abort
//! marker, the remaining stages are skipped and the aborted envelope is handed back to the caller.
use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::{
    envelope::InboundEnvelope,
    stage::{RetryStage, Stage},
};

/// Ordered chain of [`Stage`]s.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[inline]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    #[inline]
    pub fn register(&mut self, stage: Arc<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Builder-style [`Pipeline::register`].
    #[inline]
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.register(stage);
        self
    }

    /// Append a [`RetryStage`].
    pub fn with_retry(self, stage: RetryStage) -> Self {
        self.with_stage(Arc::new(stage))
    }

    /// Number of registered stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Feed `inbound` through every stage until one aborts it.
    #[instrument(
        level = "debug",
        skip(self, inbound),
        fields(path = %inbound.original_request.innermost().path)
    )]
    pub fn run(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
        let mut current = inbound;

        for stage in &self.stages {
            if current.should_abort {
                debug!(next = stage.name(), "envelope aborted, remaining stages skipped");
                break;
            }
            trace!(stage = stage.name(), "running stage");
            current = stage.process(current);
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use requeue_model::HttpRequest;
    use serde_json::json;

    use super::*;
    use crate::{dispatch::RecordingDispatcher, scheduler::ManualScheduler};

    /// Counts envelopes and passes them through.
    #[derive(Default)]
    struct CountingStage {
        seen: AtomicUsize,
    }

    impl Stage for CountingStage {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn process(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
            self.seen.fetch_add(1, Ordering::SeqCst);
            inbound
        }
    }

    /// Records the order in which stages ran.
    struct NamedStage {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Stage for NamedStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process(&self, inbound: Arc<InboundEnvelope>) -> Arc<InboundEnvelope> {
            self.log.lock().unwrap().push(self.name);
            inbound
        }
    }

    fn failed_get() -> Arc<InboundEnvelope> {
        InboundEnvelope::failure(
            HttpRequest::get("/sites").into(),
            json!({ "error": "timeout" }),
            RecordingDispatcher::shared(),
        )
        .shared()
    }

    #[test]
    fn empty_pipeline_returns_input() {
        let pipeline = Pipeline::new();
        assert!(pipeline.is_empty());

        let inbound = failed_get();
        assert!(Arc::ptr_eq(&pipeline.run(Arc::clone(&inbound)), &inbound));
    }

    #[test]
    fn stages_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new()
            .with_stage(Arc::new(NamedStage {
                name: "first",
                log: Arc::clone(&log),
            }))
            .with_stage(Arc::new(NamedStage {
                name: "second",
                log: Arc::clone(&log),
            }));

        pipeline.run(failed_get());

        assert_eq!(pipeline.stage_names(), vec!["first", "second"]);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn aborted_envelope_skips_downstream_stages() {
        let sched = ManualScheduler::new();
        let downstream = Arc::new(CountingStage::default());

        let mut pipeline = Pipeline::new();
        pipeline.register(Arc::new(RetryStage::new(Arc::new(sched.clone()))));
        pipeline.register(downstream.clone());
        assert_eq!(pipeline.len(), 2);

        let out = pipeline.run(failed_get());

        assert!(out.should_abort);
        assert_eq!(downstream.seen.load(Ordering::SeqCst), 0);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn passthrough_envelope_reaches_downstream_stages() {
        let sched = ManualScheduler::new();
        let downstream = Arc::new(CountingStage::default());
        let pipeline = Pipeline::new()
            .with_retry(RetryStage::new(Arc::new(sched.clone())))
            .with_stage(downstream.clone());

        let ok = InboundEnvelope::success(
            HttpRequest::get("/sites").into(),
            json!([]),
            RecordingDispatcher::shared(),
        )
        .shared();
        let out = pipeline.run(Arc::clone(&ok));

        assert!(Arc::ptr_eq(&out, &ok));
        assert_eq!(downstream.seen.load(Ordering::SeqCst), 1);
        sched.advance(Duration::from_secs(10));
        assert_eq!(sched.pending(), 0);
    }
}
