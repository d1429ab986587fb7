use std::fmt;

use hb_model::WorkloadKey;

use super::ShutdownSignal;

/// What ended supervision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The workload completed successfully.
    Succeeded,
    /// The workload failed, or could not start.
    Failed { reason: String },
    /// An OS signal interrupted supervision.
    Signal(ShutdownSignal),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Succeeded => f.write_str("succeeded"),
            Trigger::Failed { reason } => write!(f, "failed: {reason}"),
            Trigger::Signal(sig) => write!(f, "interrupted by {sig}"),
        }
    }
}

/// Outcome of the remote deletion performed by cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupStatus {
    Deleted,
    /// The workload was already removed by someone else.
    AlreadyGone,
    /// No workload had been resolved yet.
    NothingToDelete,
    DeleteFailed(String),
}

impl CleanupStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, CleanupStatus::DeleteFailed(_))
    }

    /// Return label value for metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CleanupStatus::Deleted => "deleted",
            CleanupStatus::AlreadyGone => "already_gone",
            CleanupStatus::NothingToDelete => "nothing_to_delete",
            CleanupStatus::DeleteFailed(_) => "delete_failed",
        }
    }
}

/// Final report handed back to the process entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisionResult {
    pub trigger: Trigger,
    pub workload: Option<WorkloadKey>,
    pub cleanup: CleanupStatus,
}

impl SupervisionResult {
    /// `0` only for a successful workload that was cleaned up, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        match (&self.trigger, self.cleanup.is_success()) {
            (Trigger::Succeeded, true) => 0,
            _ => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(trigger: Trigger, cleanup: CleanupStatus) -> SupervisionResult {
        SupervisionResult {
            trigger,
            workload: Some(WorkloadKey::new("ns", "w")),
            cleanup,
        }
    }

    #[test]
    fn only_clean_success_exits_zero() {
        assert_eq!(result(Trigger::Succeeded, CleanupStatus::Deleted).exit_code(), 0);
        assert_eq!(
            result(Trigger::Succeeded, CleanupStatus::AlreadyGone).exit_code(),
            0
        );
        assert_eq!(
            result(Trigger::Succeeded, CleanupStatus::DeleteFailed("403".into())).exit_code(),
            1
        );
        assert_eq!(
            result(
                Trigger::Failed {
                    reason: "ErrImagePull".into()
                },
                CleanupStatus::Deleted
            )
            .exit_code(),
            1
        );
        assert_eq!(
            result(Trigger::Signal(ShutdownSignal::Terminate), CleanupStatus::Deleted).exit_code(),
            1
        );
    }

    #[test]
    fn trigger_display() {
        assert_eq!(
            Trigger::Signal(ShutdownSignal::Interrupt).to_string(),
            "interrupted by SIGINT"
        );
    }
}
