//! In-memory cluster used by the engine's tests.
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use tokio::sync::mpsc;

use hb_model::{Phase, WorkloadKey, WorkloadSnapshot};

use crate::client::{ClientError, ClusterClient, LogStream, WatchEvent, WatchStream, WorkloadList};
use crate::metrics::{MetricsBackend, ReconcileOutcome};
use crate::shutdown::CleanupStatus;
use crate::tail::LineSink;

/// Behavior of one `log_stream` call.
pub(crate) enum LogScript {
    /// Yield the lines, then stay open.
    Follow(Vec<&'static str>),
    /// Yield the lines, then end.
    Finite(Vec<&'static str>),
    /// Refuse to open.
    Fail,
}

/// Behavior of one `watch` call. Unscripted calls get the shared `emit` channel.
pub(crate) enum WatchScript {
    /// Refuse to open the watch.
    Fail(ClientError),
    /// Yield the events, then end the stream.
    Finite(Vec<WatchEvent>),
    /// Yield one event, then fail the stream.
    Broken(WatchEvent, ClientError),
}

pub(crate) struct FakeCluster {
    list: Mutex<Vec<WorkloadSnapshot>>,
    list_failures: AtomicUsize,
    list_calls: AtomicUsize,
    events_tx: mpsc::UnboundedSender<WatchEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<WatchEvent>>>,
    watches: Mutex<VecDeque<WatchScript>>,
    watch_calls: AtomicUsize,
    logs: Mutex<VecDeque<LogScript>>,
    log_opens: AtomicUsize,
    deletes: Mutex<Vec<WorkloadKey>>,
    delete_error: Mutex<Option<ClientError>>,
    delete_delay: Mutex<Duration>,
}

impl FakeCluster {
    pub(crate) fn new() -> Arc<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            list: Mutex::new(Vec::new()),
            list_failures: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            watches: Mutex::new(VecDeque::new()),
            watch_calls: AtomicUsize::new(0),
            logs: Mutex::new(VecDeque::new()),
            log_opens: AtomicUsize::new(0),
            deletes: Mutex::new(Vec::new()),
            delete_error: Mutex::new(None),
            delete_delay: Mutex::new(Duration::ZERO),
        })
    }

    pub(crate) fn set_list(&self, items: Vec<WorkloadSnapshot>) {
        *self.list.lock().unwrap() = items;
    }

    /// Make the next `n` list calls fail.
    pub(crate) fn fail_lists(&self, n: usize) {
        self.list_failures.store(n, Ordering::SeqCst);
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Deliver an event on the (first) watch stream.
    pub(crate) fn emit(&self, event: WatchEvent) {
        let _ = self.events_tx.send(event);
    }

    pub(crate) fn script_watch(&self, script: WatchScript) {
        self.watches.lock().unwrap().push_back(script);
    }

    pub(crate) fn watch_calls(&self) -> usize {
        self.watch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn script_logs(&self, script: LogScript) {
        self.logs.lock().unwrap().push_back(script);
    }

    pub(crate) fn log_opens(&self) -> usize {
        self.log_opens.load(Ordering::SeqCst)
    }

    pub(crate) fn deletes(&self) -> Vec<WorkloadKey> {
        self.deletes.lock().unwrap().clone()
    }

    pub(crate) fn fail_delete(&self, err: ClientError) {
        *self.delete_error.lock().unwrap() = Some(err);
    }

    pub(crate) fn slow_delete(&self, delay: Duration) {
        *self.delete_delay.lock().unwrap() = delay;
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn list(&self, _namespace: &str, _selector: &str) -> Result<WorkloadList, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .list_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ClientError::Transport("connection refused".into()));
        }
        Ok(WorkloadList {
            items: self.list.lock().unwrap().clone(),
            resource_version: "1".into(),
        })
    }

    async fn watch(
        &self,
        _namespace: &str,
        _selector: &str,
        _resource_version: &str,
    ) -> Result<WatchStream, ClientError> {
        self.watch_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.watches.lock().unwrap().pop_front();
        match script {
            Some(WatchScript::Fail(err)) => return Err(err),
            Some(WatchScript::Finite(events)) => {
                return Ok(stream::iter(events.into_iter().map(Ok::<_, ClientError>)).boxed());
            }
            Some(WatchScript::Broken(event, err)) => {
                return Ok(stream::iter([Ok(event), Err(err)]).boxed());
            }
            None => {}
        }
        match self.events_rx.lock().unwrap().take() {
            Some(rx) => Ok(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|ev| (Ok::<_, ClientError>(ev), rx))
            })
            .boxed()),
            None => Ok(stream::pending().boxed()),
        }
    }

    async fn log_stream(&self, _key: &WorkloadKey) -> Result<LogStream, ClientError> {
        self.log_opens.fetch_add(1, Ordering::SeqCst);
        let script = self
            .logs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(LogScript::Follow(Vec::new()));

        let lines = |v: Vec<&'static str>| {
            stream::iter(
                v.into_iter()
                    .map(|l| Ok::<_, ClientError>(format!("{l}\n").into_bytes())),
            )
        };
        match script {
            LogScript::Follow(v) => Ok(lines(v).chain(stream::pending()).boxed()),
            LogScript::Finite(v) => Ok(lines(v).boxed()),
            LogScript::Fail => Err(ClientError::Api {
                code: 400,
                message: "container is not ready".into(),
            }),
        }
    }

    async fn delete(&self, key: &WorkloadKey) -> Result<(), ClientError> {
        let delay = *self.delete_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.deletes.lock().unwrap().push(key.clone());
        match self.delete_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Sink collecting forwarded lines.
#[derive(Default)]
pub(crate) struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(line).into_owned());
        Ok(())
    }
}

/// Metrics backend remembering every call.
#[derive(Default)]
pub(crate) struct RecordingMetrics {
    pub(crate) reconciles: Mutex<Vec<(Phase, ReconcileOutcome)>>,
    pub(crate) dropped: AtomicUsize,
    pub(crate) tails: AtomicUsize,
    pub(crate) cleanups: Mutex<Vec<CleanupStatus>>,
}

impl RecordingMetrics {
    pub(crate) fn outcomes(&self) -> Vec<ReconcileOutcome> {
        self.reconciles.lock().unwrap().iter().map(|(_, o)| *o).collect()
    }
}

impl MetricsBackend for RecordingMetrics {
    fn record_reconcile(&self, phase: &Phase, outcome: ReconcileOutcome) {
        self.reconciles.lock().unwrap().push((phase.clone(), outcome));
    }

    fn record_retry_dropped(&self, _: &WorkloadKey) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }

    fn record_tail_started(&self) {
        self.tails.fetch_add(1, Ordering::SeqCst);
    }

    fn record_cleanup(&self, status: &CleanupStatus) {
        self.cleanups.lock().unwrap().push(status.clone());
    }
}
