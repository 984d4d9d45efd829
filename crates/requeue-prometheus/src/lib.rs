//! Prometheus metrics backend for the requeue retry pipeline.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`requeue_core::MetricsBackend`] that exposes metrics in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use requeue_core::{ManualScheduler, RetryStage};
//! use requeue_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create prometheus metrics backend
//! let metrics = PrometheusMetrics::new()?;
//!
//! // Inject into the retry stage
//! let stage = RetryStage::new(Arc::new(ManualScheduler::new()))
//!     .with_metrics(Arc::new(metrics.clone()));
//!
//! // Expose /metrics endpoint (example with custom HTTP server)
//! // let metric_families = metrics.gather();
//! // let encoder = prometheus::TextEncoder::new();
//! // encoder.encode(&metric_families, &mut response_buffer)?;
//! # let _ = stage;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `requeue_retries_scheduled_total{method}` - Counter
//! - `requeue_retry_delay_seconds{method}` - Histogram
//! - `requeue_retry_attempt{method}` - Histogram
//! - `requeue_passthrough_total{reason}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT provide HTTP server for `/metrics` endpoint.
//! Use your application's existing HTTP framework and [`TextEncoder`].

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
