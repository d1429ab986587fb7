use std::time::Duration;

use serde::{Deserialize, Serialize};

use hb_model::BackoffStrategy;

use crate::error::CoreError;

/// Tuning knobs of the supervision engine.
///
/// Read from the `supervisor` section of the configuration file; every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SupervisorConfig {
    /// Bound on the initial list before supervision starts.
    pub sync_timeout_ms: u64,
    /// Retries granted to an unresolved reconciliation before the item is dropped.
    pub max_retries: u32,
    /// Per-item delay between retries.
    pub backoff: BackoffStrategy,
    /// Pause before re-listing after a watch ends or a list fails.
    pub watch_retry_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            sync_timeout_ms: 30_000,
            max_retries: 5,
            backoff: BackoffStrategy::default(),
            watch_retry_ms: 1_000,
        }
    }
}

impl SupervisorConfig {
    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }

    pub fn watch_retry(&self) -> Duration {
        Duration::from_millis(self.watch_retry_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sync_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "sync-timeout-ms cannot be zero".into(),
            ));
        }
        self.backoff
            .validate()
            .map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_controller_conventions() {
        let cfg = SupervisorConfig::default();
        assert_eq!(cfg.max_retries, 5);
        assert_eq!(cfg.sync_timeout(), Duration::from_secs(30));
        assert_eq!(cfg.backoff.first_ms, 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "max-retries: 2\nbackoff:\n  first-ms: 50\n";
        let cfg: SupervisorConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.backoff.first_ms, 50);
        assert_eq!(cfg.backoff.factor, 2.0);
        assert_eq!(cfg.watch_retry_ms, 1_000);
    }

    #[test]
    fn zero_sync_timeout_is_rejected() {
        let cfg = SupervisorConfig {
            sync_timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::InvalidConfig(_))));
    }
}
