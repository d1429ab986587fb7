use std::fmt;

use serde::{Deserialize, Serialize};

/// Orchestrator-reported lifecycle stage of a workload.
///
/// Parsing never fails: any value outside the known set is kept verbatim in [`Phase::Other`]
/// so the reconciler can log it and treat it as not-yet-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phase {
    /// Accepted by the orchestrator, containers not running yet.
    Pending,
    /// At least one container is running.
    Running,
    /// All containers terminated successfully.
    Succeeded,
    /// At least one container terminated in failure.
    Failed,
    /// The orchestrator could not determine the state.
    #[default]
    Unknown,
    /// A phase value this crate does not recognize.
    Other(String),
}

impl Phase {
    /// Returns the canonical orchestrator string.
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Pending => "Pending",
            Phase::Running => "Running",
            Phase::Succeeded => "Succeeded",
            Phase::Failed => "Failed",
            Phase::Unknown => "Unknown",
            Phase::Other(s) => s,
        }
    }
}

impl From<&str> for Phase {
    fn from(s: &str) -> Self {
        match s {
            "Pending" => Phase::Pending,
            "Running" => Phase::Running,
            "Succeeded" => Phase::Succeeded,
            "Failed" => Phase::Failed,
            "Unknown" | "" => Phase::Unknown,
            other => Phase::Other(other.to_string()),
        }
    }
}

impl From<String> for Phase {
    fn from(s: String) -> Self {
        Phase::from(s.as_str())
    }
}

impl From<Phase> for String {
    fn from(p: Phase) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_phases() {
        assert_eq!(Phase::from("Pending"), Phase::Pending);
        assert_eq!(Phase::from("Running"), Phase::Running);
        assert_eq!(Phase::from("Succeeded"), Phase::Succeeded);
        assert_eq!(Phase::from("Failed"), Phase::Failed);
        assert_eq!(Phase::from("Unknown"), Phase::Unknown);
    }

    #[test]
    fn keeps_unrecognized_values() {
        let p = Phase::from("Evicted");
        assert_eq!(p, Phase::Other("Evicted".into()));
        assert_eq!(p.to_string(), "Evicted");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Phase::Running).unwrap();
        assert_eq!(json, r#""Running""#);

        let back: Phase = serde_json::from_str(r#""Weird""#).unwrap();
        assert_eq!(back, Phase::Other("Weird".into()));
    }
}
