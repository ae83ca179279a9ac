//! Error taxonomy for restart orchestration
//!
//! Per-instance failures (`WorkloadError`) are contained and aggregated into
//! the pass report; pass-level failures (`ReconcileError`) abort the pass
//! and propagate to the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::WorkloadKind;

/// Failure of a single fetch or update against the cluster
///
/// Identity context lives on the `WorkloadRef` recorded next to the error,
/// not in the error itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkloadError {
    /// The workload vanished between listing and fetch
    #[error("workload not found")]
    NotFound,

    /// The object changed since it was fetched; the update was rejected
    #[error("resource version conflict: {0}")]
    Conflict(String),

    /// Transport, authorization, or other API failure
    #[error("Kubernetes API error: {0}")]
    Api(String),
}

impl WorkloadError {
    /// Classify a kube client error by API status code
    pub(crate) fn from_kube(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 404 => Self::NotFound,
            kube::Error::Api(response) if response.code == 409 => Self::Conflict(response.message),
            other => Self::Api(other.to_string()),
        }
    }
}

/// Failures that abort an entire reconcile pass
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Could not enumerate one kind; no partial report is produced
    #[error("failed to list {kind} workloads")]
    Listing {
        kind: WorkloadKind,
        #[source]
        source: WorkloadError,
    },

    /// The caller's shutdown signal fired mid-pass
    #[error("reconcile pass cancelled before completion")]
    Cancelled,
}

/// Failures establishing the cluster connection
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    #[error("failed to read kubeconfig {}: {source}", path.display())]
    ReadKubeconfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cluster unreachable: {0}")]
    Unreachable(String),
}
