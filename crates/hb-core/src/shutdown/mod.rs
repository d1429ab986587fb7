//! Termination signals, the guarded cleanup and the final supervision result.
mod cleanup;
mod result;
mod signal;

pub use cleanup::Cleanup;
pub use result::{CleanupStatus, SupervisionResult, Trigger};
pub use signal::{ShutdownListener, ShutdownSignal};
