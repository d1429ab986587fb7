use std::io::{self, Write};

/// Destination of forwarded workload output.
pub trait LineSink: Send + Sync + 'static {
    /// Write one line as received, including its trailing newline if present.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;
}

/// Forwards lines to the process's standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(line)?;
        out.flush()
    }
}
