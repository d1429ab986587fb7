use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Capped exponential backoff used between retries of the same item.
///
/// The delay before retry number `n` (zero-based) is `first_ms * factor^n`, capped at `max_ms`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BackoffStrategy {
    pub first_ms: u64,
    pub max_ms: u64,
    pub factor: f64,
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self {
            first_ms: 5,
            max_ms: 1_000_000,
            factor: 2.0,
        }
    }
}

impl BackoffStrategy {
    /// Delay before the retry that follows `failures` previous failures.
    pub fn delay(&self, failures: u32) -> Duration {
        let exp = self.factor.powi(failures.min(i32::MAX as u32) as i32);
        let raw = self.first_ms as f64 * exp;
        let capped = if raw.is_finite() {
            raw.min(self.max_ms as f64)
        } else {
            self.max_ms as f64
        };
        Duration::from_millis(capped as u64)
    }

    /// Validate the strategy.
    ///
    /// Rules:
    /// - `factor` is finite and `>= 1.0`;
    /// - `first_ms <= max_ms`.
    pub fn validate(&self) -> ModelResult<()> {
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ModelError::InvalidBackoff(format!(
                "factor must be >= 1.0, got {}",
                self.factor
            )));
        }
        if self.first_ms > self.max_ms {
            return Err(ModelError::InvalidBackoff(format!(
                "first_ms ({}) exceeds max_ms ({})",
                self.first_ms, self.max_ms
            )));
        }
        Ok(())
    }
}
