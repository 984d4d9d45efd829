use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::{
    error::{LoggerError, LoggerResult},
    object::{LoggerFormat, LoggerLevel, LoggerTimeZone},
};

/// Filter expression override (e.g. `requeue_core=trace,info`).
pub const ENV_LOG: &str = "REQUEUE_LOG";
/// Output format override (`text|json|journald`).
pub const ENV_LOG_FORMAT: &str = "REQUEUE_LOG_FORMAT";
/// Timestamp timezone override (`utc|local`).
pub const ENV_LOG_TZ: &str = "REQUEUE_LOG_TZ";

/// Logger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Output format.
    pub format: LoggerFormat,
    /// Log level filter expression (e.g., "info", "requeue_core=debug,info").
    pub level: LoggerLevel,
    /// Timezone for timestamps.
    pub tz: LoggerTimeZone,
    /// Whether to include module/target names in log output.
    pub with_targets: bool,
    /// Whether to use colored output.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    /// Default configuration overlaid with `REQUEUE_LOG`, `REQUEUE_LOG_FORMAT` and `REQUEUE_LOG_TZ`.
    ///
    /// Unset or empty variables keep the default; a set but invalid value is an error.
    pub fn from_env() -> LoggerResult<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlays values returned by `lookup` for the `REQUEUE_LOG*` keys on top of `self`.
    pub fn overlay<F>(mut self, lookup: F) -> LoggerResult<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let read = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let wrap = |key: &'static str| {
            move |e: LoggerError| LoggerError::Env {
                key,
                source: Box::new(e),
            }
        };

        if let Some(level) = read(ENV_LOG) {
            self.level = level.parse().map_err(wrap(ENV_LOG))?;
        }
        if let Some(format) = read(ENV_LOG_FORMAT) {
            self.format = format.parse().map_err(wrap(ENV_LOG_FORMAT))?;
        }
        if let Some(tz) = read(ENV_LOG_TZ) {
            self.tz = tz.parse().map_err(wrap(ENV_LOG_TZ))?;
        }
        Ok(self)
    }

    /// Determines whether colored output should be used.
    ///
    /// Color is enabled only if `use_color` is `true` and stdout is a terminal.
    /// Call during logger initialization, not during config parsing.
    ///
    /// # Examples
    /// ```rust
    /// use requeue_observe::LoggerConfig;
    ///
    /// let config = LoggerConfig::default();
    /// let should_use_color = config.should_use_color();
    /// // Returns true only if stdout is currently a terminal
    /// ```
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stdout().is_terminal()
    }
}
