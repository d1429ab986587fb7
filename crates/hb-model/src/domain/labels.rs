use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

use super::MAX_LABEL_VALUE_LEN;

/// Structured key–value metadata based on [`BTreeMap`].
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(pub BTreeMap<String, String>);

impl Labels {
    /// Create an empty set of labels.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Insert or overwrite a label.
    ///
    /// Returns `self` for chaining.
    pub fn insert<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), val.into());
        self
    }

    /// Iterate through all labels as `(&str, &str)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render an equality-based label selector (`k1=v1,k2=v2`).
    ///
    /// Keys are emitted in sorted order, so the result is stable.
    pub fn selector(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check that a value is usable as a Kubernetes label value.
    ///
    /// Rules:
    /// - at most 63 characters;
    /// - alphanumerics, `-`, `_` and `.` only;
    /// - begins and ends with an alphanumeric character (empty is allowed).
    pub fn validate_value(value: &str) -> ModelResult<()> {
        let invalid = |reason| ModelError::InvalidLabel {
            value: value.to_string(),
            reason,
        };

        if value.len() > MAX_LABEL_VALUE_LEN {
            return Err(invalid("longer than 63 characters"));
        }
        if value.is_empty() {
            return Ok(());
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(invalid("contains characters other than [A-Za-z0-9-_.]"));
        }
        let first = value.chars().next().unwrap_or('-');
        let last = value.chars().last().unwrap_or('-');
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(invalid("must begin and end with an alphanumeric character"));
        }
        Ok(())
    }
}
