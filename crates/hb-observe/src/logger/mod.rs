mod config;
mod error;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::{LoggerError, LoggerResult};
pub use object::LoggerFormat;
pub use object::LoggerLevel;
pub use object::{LoggerTimeZone, init_local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Once initialized, all `tracing` macros (`info!`, `debug!`, etc.) use this configuration.
/// A second call returns [`LoggerError::AlreadyInitialized`].
///
/// # Important: Local Timezone
/// For `LoggerTimeZone::Local`, call [`init_local_offset`] in `main()` before the tokio
/// runtime spawns any threads.
///
/// # Examples
/// ```rust
/// use hb_observe::{LoggerConfig, init_logger};
///
/// let config = LoggerConfig::default();
/// init_logger(&config).expect("Failed to initialize logger");
///
/// tracing::info!("Logger initialized successfully");
/// ```
pub fn init_logger(cfg: &LoggerConfig) -> LoggerResult<()> {
    log::install(cfg)
}
