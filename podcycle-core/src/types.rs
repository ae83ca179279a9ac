//! Workload identity and outcome types
//!
//! Simplified representations of the cluster objects the orchestrator
//! touches, plus the aggregate outcome of one reconcile pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::WorkloadError;

/// Workload kinds the orchestrator knows how to restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadKind {
    Deployment,
    StatefulSet,
    DaemonSet,
}

impl WorkloadKind {
    /// Processing order for a reconcile pass; affects output ordering only
    pub const ALL: [WorkloadKind; 3] = [
        WorkloadKind::Deployment,
        WorkloadKind::StatefulSet,
        WorkloadKind::DaemonSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::StatefulSet => "StatefulSet",
            Self::DaemonSet => "DaemonSet",
        }
    }
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and mutable template state of one workload instance
///
/// `(kind, namespace, name)` identifies the instance within one cluster
/// snapshot. The resource version is carried from fetch to update so a
/// concurrent edit is rejected instead of overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRef {
    pub kind: WorkloadKind,
    pub namespace: String,
    pub name: String,
    /// Annotations on the pod template metadata; empty until first restart
    #[serde(default)]
    pub pod_template_annotations: BTreeMap<String, String>,
    /// Optimistic-concurrency token from the last fetch
    pub resource_version: Option<String>,
}

impl std::fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

/// A matched workload whose restart attempt failed
#[derive(Debug, Clone)]
pub struct RestartFailure {
    pub workload: WorkloadRef,
    pub error: WorkloadError,
}

/// Aggregate outcome of one reconcile pass
///
/// `matched == restarted + failures.len()` holds after every completed
/// pass; failures keep the discovery order within each kind.
#[derive(Debug, Clone, Default)]
pub struct RestartReport {
    /// Workloads whose name satisfied the selector, across all kinds
    pub matched: usize,
    /// Matched workloads whose rollout trigger was written successfully
    pub restarted: usize,
    pub failures: Vec<RestartFailure>,
}

impl RestartReport {
    pub fn fully_successful(&self) -> bool {
        self.failures.is_empty()
    }
}
