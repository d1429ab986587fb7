use std::fmt;
use std::io;

/// OS signal that requested shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownSignal {
    Hangup,
    Interrupt,
    Terminate,
    Quit,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::Hangup => "SIGHUP",
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Quit => "SIGQUIT",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handlers for the termination signals, installed once at startup.
///
/// Registering early means a signal that arrives while the workload is being created is not
/// lost: it is delivered by the first [`ShutdownListener::recv`].
pub struct ShutdownListener {
    #[cfg(unix)]
    streams: unix::Streams,
}

impl ShutdownListener {
    /// Install the handlers. Must be called inside a tokio runtime.
    pub fn register() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            streams: unix::Streams::register()?,
        })
    }

    /// Wait for the next termination signal.
    pub async fn recv(self) -> ShutdownSignal {
        #[cfg(unix)]
        {
            let mut streams = self.streams;
            streams.recv().await
        }
        #[cfg(not(unix))]
        {
            match tokio::signal::ctrl_c().await {
                Ok(()) => ShutdownSignal::Interrupt,
                Err(_) => std::future::pending().await,
            }
        }
    }
}

#[cfg(unix)]
mod unix {
    use std::io;

    use tokio::signal::unix::{Signal, SignalKind, signal};

    use super::ShutdownSignal;

    pub(super) struct Streams {
        hup: Signal,
        int: Signal,
        term: Signal,
        quit: Signal,
    }

    impl Streams {
        pub(super) fn register() -> io::Result<Self> {
            Ok(Self {
                hup: signal(SignalKind::hangup())?,
                int: signal(SignalKind::interrupt())?,
                term: signal(SignalKind::terminate())?,
                quit: signal(SignalKind::quit())?,
            })
        }

        pub(super) async fn recv(&mut self) -> ShutdownSignal {
            tokio::select! {
                _ = self.hup.recv() => ShutdownSignal::Hangup,
                _ = self.int.recv() => ShutdownSignal::Interrupt,
                _ = self.term.recv() => ShutdownSignal::Terminate,
                _ = self.quit.recv() => ShutdownSignal::Quit,
            }
        }
    }
}
