//! Cluster access seam for workload listing and mutation

use async_trait::async_trait;

use crate::error::WorkloadError;
use crate::types::{WorkloadKind, WorkloadRef};

/// Cluster-side operations the orchestrator needs, per workload kind
///
/// `update` submits the pod-template annotations together with the resource
/// version carried on the `WorkloadRef`. An out-of-date version must surface
/// as `Conflict` rather than overwrite a concurrent edit.
#[async_trait]
pub trait WorkloadStore: Send + Sync {
    /// List every instance of `kind` across all namespaces
    async fn list_all(&self, kind: WorkloadKind) -> Result<Vec<WorkloadRef>, WorkloadError>;

    /// Fetch a single instance
    async fn get(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<WorkloadRef, WorkloadError>;

    /// Write back a mutated instance
    async fn update(&self, workload: &WorkloadRef) -> Result<(), WorkloadError>;
}
