//! Typed values of [`LoggerConfig`](crate::LoggerConfig) fields.
mod format;
mod level;
mod rfc3339;
mod timezone;

pub use format::LoggerFormat;
pub use level::LoggerLevel;
pub(crate) use rfc3339::LoggerRfc3339;
pub use timezone::{LoggerTimeZone, init_local_offset};
