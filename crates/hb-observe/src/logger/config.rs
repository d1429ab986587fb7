use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::logger::object::{LoggerFormat, LoggerLevel, LoggerTimeZone};

/// How diagnostics are rendered on stderr.
///
/// Every field has a default, so a partial document (or `{}`) deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// Filter directive, e.g. `info` or `hb_core=debug,info`.
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Print the event target (module path) next to each line.
    pub targets: bool,
    /// Colorize text output. Ignored when stderr is not a terminal.
    pub color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::Utc,
            targets: true,
            color: true,
        }
    }
}

impl LoggerConfig {
    pub(crate) fn color_enabled(&self) -> bool {
        self.color && std::io::stderr().is_terminal()
    }
}
