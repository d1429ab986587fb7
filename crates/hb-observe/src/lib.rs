//! Logging setup shared by the humpback binaries.
//!
//! Diagnostics are written to stderr; stdout is reserved for the supervised workload's output.
mod logger;
pub use logger::*;
