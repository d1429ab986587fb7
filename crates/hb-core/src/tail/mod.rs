//! Output forwarding for a running workload.
mod sink;
pub use sink::{LineSink, StdoutSink};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hb_model::WorkloadKey;

use crate::client::{ClientError, ClusterClient};

/// Result of [`TailSession::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailStart {
    /// The stream was opened and the copy task spawned.
    Started,
    /// A previous call already started the session.
    AlreadyStarted,
    /// The session was closed before it could start.
    Closed,
}

/// One log stream of the supervised workload.
///
/// `started` is only ever flipped back to `false` when opening the stream fails, so a stream
/// that ended on its own is never reopened.
pub struct TailSession {
    key: WorkloadKey,
    started: AtomicBool,
    cancel: CancellationToken,
    sink: Arc<dyn LineSink>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TailSession {
    pub fn new(key: WorkloadKey, sink: Arc<dyn LineSink>) -> Self {
        Self {
            key,
            started: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            sink,
            task: Mutex::new(None),
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Open the stream and spawn the copy task, unless already done.
    ///
    /// An open failure leaves the session startable again.
    pub async fn start(&self, client: &dyn ClusterClient) -> Result<TailStart, ClientError> {
        if self.cancel.is_cancelled() {
            return Ok(TailStart::Closed);
        }
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(TailStart::AlreadyStarted);
        }

        let mut stream = match client.log_stream(&self.key).await {
            Ok(s) => s,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let cancel = self.cancel.clone();
        let sink = Arc::clone(&self.sink);
        let key = self.key.clone();
        let handle = tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    _ = cancel.cancelled() => break,
                    next = stream.next() => next,
                };
                match next {
                    Some(Ok(line)) => {
                        if let Err(e) = sink.write_line(&line) {
                            warn!(workload = %key, error = %e, "failed to forward output");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(workload = %key, error = %e, "log stream failed");
                        break;
                    }
                    None => {
                        debug!(workload = %key, "log stream ended");
                        break;
                    }
                }
            }
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        info!(workload = %self.key, "tailing output");
        Ok(TailStart::Started)
    }

    /// Stop forwarding. Safe to call any number of times.
    pub fn close(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        debug!(workload = %self.key, "tail closed");
    }

    /// Wait up to `limit` for the copy task to finish.
    pub async fn wait(&self, limit: Duration) {
        let handle = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            if tokio::time::timeout(limit, handle).await.is_err() {
                warn!(workload = %self.key, "tail task did not stop in time");
            }
        }
    }
}
