use thiserror::Error;

/// Errors raised while parsing logger settings or installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format {0:?}, expected text, json or journald")]
    UnknownFormat(String),

    #[error("unknown log timezone {0:?}, expected utc or local")]
    UnknownTimeZone(String),

    #[error("bad log filter: {0}")]
    BadFilter(String),

    #[error("journald output is only available on linux")]
    JournaldUnavailable,

    #[error("cannot connect to journald: {0}")]
    Journald(String),

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,

    #[error("{key}: {source}")]
    Env {
        key: &'static str,
        #[source]
        source: Box<LoggerError>,
    },
}

pub type LoggerResult<T> = Result<T, LoggerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_error_names_variable_and_cause() {
        let err = LoggerError::Env {
            key: "REQUEUE_LOG_TZ",
            source: Box::new(LoggerError::UnknownTimeZone("mars".into())),
        };
        assert_eq!(
            err.to_string(),
            r#"REQUEUE_LOG_TZ: unknown log timezone "mars", expected utc or local"#
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
