use thiserror::Error;

use hb_core::ClientError;

/// A pod that cannot be turned into a workload snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("pod has no name")]
    MissingName,

    #[error("pod {name} has no namespace")]
    MissingNamespace { name: String },

    #[error("pod {name} has no status")]
    MissingStatus { name: String },
}

#[derive(Debug, Error)]
pub enum KubeError {
    #[error("failed to read kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("kubernetes client error: {0}")]
    Client(#[from] kube::Error),

    #[error("invalid manifest: {0}")]
    Manifest(String),

    #[error("manifest describes a {kind}, expected a Pod")]
    NotAPod { kind: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Classify a kube error for the engine.
pub(crate) fn client_error(err: kube::Error) -> ClientError {
    match err {
        kube::Error::Api(resp) => match resp.code {
            404 => ClientError::NotFound(resp.message),
            410 => ClientError::Expired(resp.message),
            code => ClientError::Api {
                code,
                message: resp.message,
            },
        },
        kube::Error::SerdeError(e) => ClientError::Decode(e.to_string()),
        other => ClientError::Transport(other.to_string()),
    }
}
