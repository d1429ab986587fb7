use serde::{Deserialize, Serialize};

use crate::domain::REASON_CONTAINER_CREATING;

/// Per-container status as seen in the workload snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    /// Container name inside the workload.
    pub name: String,
    /// Waiting reason, present only while the container is in the waiting state.
    ///
    /// A waiting container without a reported reason carries an empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_reason: Option<String>,
}

impl ContainerStatus {
    /// Status of a container that is not waiting (running or terminated).
    pub fn ready(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            waiting_reason: None,
        }
    }

    /// Status of a container waiting for the given reason.
    pub fn waiting(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            waiting_reason: Some(reason.into()),
        }
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.waiting_reason.is_some()
    }

    /// Returns the waiting reason if the container is stuck on something other than
    /// image/runtime preparation.
    pub fn startup_failure(&self) -> Option<&str> {
        match self.waiting_reason.as_deref() {
            Some(REASON_CONTAINER_CREATING) | None => None,
            Some(reason) => Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_creating_is_not_a_failure() {
        let c = ContainerStatus::waiting("main", REASON_CONTAINER_CREATING);
        assert!(c.is_waiting());
        assert_eq!(c.startup_failure(), None);
    }

    #[test]
    fn other_waiting_reasons_are_failures() {
        let c = ContainerStatus::waiting("main", "ImagePullBackOff");
        assert_eq!(c.startup_failure(), Some("ImagePullBackOff"));

        let blank = ContainerStatus::waiting("main", "");
        assert_eq!(blank.startup_failure(), Some(""));
    }

    #[test]
    fn non_waiting_container_is_fine() {
        let c = ContainerStatus::ready("main");
        assert!(!c.is_waiting());
        assert_eq!(c.startup_failure(), None);
    }
}
