//! Logging setup shared by requeue binaries.
//!
//! Build a [`LoggerConfig`] (from JSON, from `REQUEUE_LOG*` environment variables or by hand)
//! and hand it to [`init_logger`] once at startup.
mod logger;
pub use logger::*;
