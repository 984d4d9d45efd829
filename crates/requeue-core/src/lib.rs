//! Retry pipeline for data-layer HTTP requests.
//!
//! A completed attempt enters the [`Pipeline`] as an [`InboundEnvelope`]. The [`RetryStage`]
//! decides whether a failure is resubmitted: if so it schedules a dispatch of the next attempt
//! through the injected [`Scheduler`] and aborts the envelope; otherwise the envelope flows on.
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod policy;
pub mod scheduler;
pub mod stage;

pub use config::RetryConfig;
pub use dispatch::{DispatchHandle, Dispatcher, RecordingDispatcher};
pub use envelope::{InboundEnvelope, Outcome};
pub use error::{CoreError, CoreResult};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, PassReason, noop_metrics};
pub use pipeline::Pipeline;
pub use policy::{DelayFn, RetryDecision, evaluate, evaluate_with_thread_rng};
pub use scheduler::{
    Callback, ManualScheduler, Scheduler, SchedulerHandle, TimerHandle, TokioScheduler,
};
pub use stage::{RetryStage, Stage};

pub mod prelude {
    pub use crate::envelope::InboundEnvelope;
    pub use crate::error::CoreError;
    pub use crate::pipeline::Pipeline;
    pub use crate::scheduler::{Scheduler, SchedulerHandle};
    pub use crate::stage::{RetryStage, Stage};
}
