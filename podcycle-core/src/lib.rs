//! Rolling-restart orchestration for Kubernetes workloads
//!
//! Discovers Deployments, StatefulSets, and DaemonSets across all
//! namespaces, selects instances by name, and triggers a rolling restart
//! for each match by stamping the pod template's restart annotation. The
//! platform's own template-change reconciliation does the actual rollout;
//! this crate only triggers it and aggregates the outcome.

pub mod client;
pub mod clock;
pub mod error;
pub mod reconciler;
pub mod restart;
pub mod selector;
pub mod store;
pub mod types;
pub mod workloads;

pub use client::K8sClient;
pub use clock::{Clock, SystemClock};
pub use error::{ClientError, ReconcileError, WorkloadError};
pub use reconciler::{LogObserver, ProgressObserver, Reconciler};
pub use restart::{RestartTrigger, RESTARTED_AT_ANNOTATION};
pub use selector::{NameSelector, TokenSelector};
pub use store::WorkloadStore;
pub use types::{RestartFailure, RestartReport, WorkloadKind, WorkloadRef};
pub use workloads::KubeWorkloadStore;
