use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::logger::LoggerError;

/// Validated `tracing_subscriber::EnvFilter` expression.
///
/// Stores the raw filter string (`"info"`, `"hb_core=debug,kube=warn,info"`) after checking it
/// with `EnvFilter::try_new`, so [`LoggerLevel::to_env_filter`] cannot fail later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// Creates a level from a string-like value.
    ///
    /// ```
    /// use hb_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("hb_core=debug,info").unwrap();
    /// assert_eq!(lvl.as_str(), "hb_core=debug,info");
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the `EnvFilter` for this expression.
    pub fn to_env_filter(&self) -> EnvFilter {
        // Validated on construction.
        EnvFilter::try_new(self.as_str()).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self("info".to_string())
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        match EnvFilter::try_new(&s) {
            Ok(_) => Ok(LoggerLevel(s)),
            Err(e) => Err(LoggerError::InvalidLevel(format!("{s}: {e}"))),
        }
    }
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::LoggerLevel;

    #[test]
    fn accepts_valid_levels() {
        for lvl in ["info", "warn", "trace", "hb_core=trace,kube=warn,info"] {
            assert!(
                lvl.parse::<LoggerLevel>().is_ok(),
                "expected valid LoggerLevel for {lvl}"
            );
        }
    }

    #[test]
    fn rejects_invalid_levels() {
        for lvl in ["hb_core=chatty", "kube=verbose,info"] {
            assert!(
                lvl.parse::<LoggerLevel>().is_err(),
                "expected error for invalid LoggerLevel {lvl}"
            );
        }
    }

    #[test]
    fn default_is_info() {
        let lvl = LoggerLevel::default();
        assert_eq!(lvl.to_string(), "info");
        let _filter = lvl.to_env_filter();
    }

    #[test]
    fn deserializes_from_plain_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(lvl.as_str(), "debug");
    }
}
