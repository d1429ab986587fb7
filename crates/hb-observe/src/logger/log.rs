use tracing_subscriber::{Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::logger::{
    config::LoggerConfig,
    error::{LoggerError, LoggerResult},
    object::{LoggerFormat, LoggerRfc3339},
};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs the global subscriber: one output layer plus the level filter.
pub(crate) fn install(cfg: &LoggerConfig) -> LoggerResult<()> {
    let output = output_layer(cfg)?;
    tracing_subscriber::registry()
        .with(output)
        .with(cfg.level.to_env_filter())
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)
}

fn output_layer(cfg: &LoggerConfig) -> LoggerResult<OutputLayer> {
    let timer = LoggerRfc3339::new(cfg.tz);
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(cfg.color_enabled())
            .with_target(cfg.targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(cfg.targets)
            .with_timer(timer)
            .boxed(),
        LoggerFormat::Journald => journald_layer()?,
    };
    Ok(layer)
}

#[cfg(target_os = "linux")]
fn journald_layer() -> LoggerResult<OutputLayer> {
    tracing_journald::layer()
        .map(Layer::boxed)
        .map_err(|e| LoggerError::JournaldInitFailed(e.to_string()))
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> LoggerResult<OutputLayer> {
    Err(LoggerError::JournaldNotSupported)
}
