use std::path::Path;

use async_trait::async_trait;
use futures::io::AsyncBufReadExt;
use futures::{StreamExt, TryStreamExt, stream};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{DeleteParams, ListParams, LogParams, PostParams, WatchEvent as KubeWatchEvent, WatchParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};
use tracing::{debug, info, instrument, warn};

use hb_core::{ClientError, ClusterClient, LogStream, WatchEvent, WatchStream, WorkloadList};
use hb_model::{WorkloadKey, WorkloadSnapshot};

use crate::decode::decode_pod;
use crate::error::{DecodeError, KubeError, client_error};
use crate::manifest::parse_manifest;

/// Build a client from `kubeconfig`, or infer one (in-cluster or default kubeconfig).
pub async fn connect(kubeconfig: Option<&Path>) -> Result<KubeCluster, KubeError> {
    let client = match kubeconfig {
        Some(path) => {
            debug!(path = %path.display(), "loading kubeconfig");
            let kc = Kubeconfig::read_from(path)?;
            let config = Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default()).await?;
            Client::try_from(config)?
        }
        None => Client::try_default().await?,
    };
    Ok(KubeCluster::new(client))
}

/// Pods API over one kube client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }

    /// Create the pod described by `manifest` in `namespace`.
    #[instrument(skip(self, manifest))]
    pub async fn create_workload(
        &self,
        namespace: &str,
        manifest: &str,
    ) -> Result<WorkloadKey, KubeError> {
        let pod = parse_manifest(namespace, manifest)?;
        let created = self.pods(namespace).create(&PostParams::default(), &pod).await?;

        let name = created.metadata.name.ok_or(DecodeError::MissingName)?;
        let key = WorkloadKey::new(namespace, name);
        info!(workload = %key, "workload created");
        Ok(key)
    }
}

fn decode_or_skip(pod: &Pod) -> Option<WorkloadSnapshot> {
    match decode_pod(pod) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(error = %e, "skipping undecodable pod");
            None
        }
    }
}

fn translate(event: KubeWatchEvent<Pod>) -> Option<Result<WatchEvent, ClientError>> {
    match event {
        KubeWatchEvent::Added(pod) | KubeWatchEvent::Modified(pod) => {
            decode_or_skip(&pod).map(|s| Ok(WatchEvent::Applied(s)))
        }
        KubeWatchEvent::Deleted(pod) => decode_or_skip(&pod).map(|s| Ok(WatchEvent::Deleted(s))),
        KubeWatchEvent::Bookmark(_) => None,
        KubeWatchEvent::Error(resp) => Some(Err(client_error(kube::Error::Api(resp)))),
    }
}

#[async_trait]
impl ClusterClient for KubeCluster {
    async fn list(&self, namespace: &str, selector: &str) -> Result<WorkloadList, ClientError> {
        let list = self
            .pods(namespace)
            .list(&ListParams::default().labels(selector))
            .await
            .map_err(client_error)?;

        Ok(WorkloadList {
            resource_version: list.metadata.resource_version.unwrap_or_default(),
            items: list.items.iter().filter_map(decode_or_skip).collect(),
        })
    }

    async fn watch(
        &self,
        namespace: &str,
        selector: &str,
        resource_version: &str,
    ) -> Result<WatchStream, ClientError> {
        let events = self
            .pods(namespace)
            .watch(&WatchParams::default().labels(selector), resource_version)
            .await
            .map_err(client_error)?;

        Ok(events
            .map_err(client_error)
            .filter_map(|item| async move {
                match item {
                    Ok(event) => translate(event),
                    Err(e) => Some(Err(e)),
                }
            })
            .boxed())
    }

    async fn log_stream(&self, key: &WorkloadKey) -> Result<LogStream, ClientError> {
        let params = LogParams {
            follow: true,
            ..LogParams::default()
        };
        let reader = self
            .pods(key.namespace())
            .log_stream(key.name(), &params)
            .await
            .map_err(client_error)?;

        let lines = stream::unfold(Some(Box::pin(reader)), |state| async move {
            let mut reader = state?;
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line).await {
                Ok(0) => None,
                Ok(_) => Some((Ok(line), Some(reader))),
                Err(e) => Some((Err(ClientError::Transport(e.to_string())), None)),
            }
        });
        Ok(lines.boxed())
    }

    async fn delete(&self, key: &WorkloadKey) -> Result<(), ClientError> {
        self.pods(key.namespace())
            .delete(key.name(), &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(client_error)
    }
}
