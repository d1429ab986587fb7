use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format '{0}', expected text, json or journald")]
    InvalidFormat(String),

    #[error("journald output is only available on linux")]
    JournaldNotSupported,

    #[error("cannot connect to journald: {0}")]
    JournaldInitFailed(String),

    #[error("a global logger is already installed")]
    AlreadyInitialized,

    #[error("unknown timezone '{0}', expected utc or local")]
    InvalidTimeZone(String),

    #[error("bad log level directive: {0}")]
    InvalidLevel(String),
}

pub type LoggerResult<T> = Result<T, LoggerError>;
