//! Observation feed: list, then watch, and keep the cache in sync.
//!
//! Every observed change is reduced to a [`WorkloadKey`] pushed onto the work queue; the feed
//! never interprets the workload's state.
mod cache;
pub use cache::WorkloadCache;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use hb_model::WorkloadKey;

use crate::client::{ClientError, ClusterClient, WatchEvent};
use crate::queue::WorkQueue;

pub struct Feed {
    client: Arc<dyn ClusterClient>,
    namespace: String,
    selector: String,
    cache: WorkloadCache,
    queue: WorkQueue<WorkloadKey>,
    retry: Duration,
}

impl Feed {
    pub fn new(
        client: Arc<dyn ClusterClient>,
        namespace: impl Into<String>,
        selector: impl Into<String>,
        cache: WorkloadCache,
        queue: WorkQueue<WorkloadKey>,
        retry: Duration,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            selector: selector.into(),
            cache,
            queue,
            retry,
        }
    }

    /// Run until `stop` is cancelled.
    ///
    /// `synced` flips to `true` after the first successful list has been loaded.
    #[instrument(name = "feed", skip_all, fields(namespace = %self.namespace, selector = %self.selector))]
    pub async fn run(self, synced: watch::Sender<bool>, stop: CancellationToken) {
        loop {
            let outcome = tokio::select! {
                _ = stop.cancelled() => break,
                res = self.sync_once(&synced, &stop) => res,
            };
            match outcome {
                Ok(()) => debug!("watch closed, re-listing"),
                Err(e) => warn!(error = %e, "observation failed, re-listing"),
            }

            tokio::select! {
                _ = stop.cancelled() => break,
                _ = tokio::time::sleep(self.retry) => {}
            }
        }
        debug!("feed stopped");
    }

    async fn sync_once(
        &self,
        synced: &watch::Sender<bool>,
        stop: &CancellationToken,
    ) -> Result<(), ClientError> {
        let list = self.client.list(&self.namespace, &self.selector).await?;
        debug!(items = list.items.len(), version = %list.resource_version, "listed");

        for key in self.cache.replace(list.items) {
            self.queue.add(key);
        }
        synced.send_replace(true);

        let mut events = self
            .client
            .watch(&self.namespace, &self.selector, &list.resource_version)
            .await?;

        loop {
            let next = tokio::select! {
                _ = stop.cancelled() => return Ok(()),
                next = events.next() => next,
            };
            match next {
                Some(Ok(event)) => self.observe(event),
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            }
        }
    }

    fn observe(&self, event: WatchEvent) {
        let key = match event {
            WatchEvent::Applied(snapshot) => {
                debug!(workload = %snapshot.key(), phase = %snapshot.phase, "applied");
                self.cache.apply(snapshot)
            }
            WatchEvent::Deleted(snapshot) => {
                let key = snapshot.key();
                debug!(workload = %key, "deleted");
                self.cache.remove(&key);
                key
            }
        };
        self.queue.add(key);
    }
}
