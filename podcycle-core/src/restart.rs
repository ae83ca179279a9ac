//! Rollout trigger
//!
//! Forces a fresh rollout by stamping the pod template's restart annotation
//! and writing the workload back. The platform rolls new pods on any pod
//! template change; this code never moves pods itself.

use crate::clock::Clock;
use crate::error::WorkloadError;
use crate::store::WorkloadStore;
use crate::types::{WorkloadKind, WorkloadRef};

/// Annotation key the platform recognizes as a rollout trigger (the same
/// key `kubectl rollout restart` writes)
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Fetch-mutate-write cycle shared by every workload kind
pub struct RestartTrigger<S, C> {
    store: S,
    clock: C,
}

impl<S: WorkloadStore, C: Clock> RestartTrigger<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Fetch the workload, stamp the restart annotation, write it back
    ///
    /// Every invocation stamps a fresh timestamp, so repeating it restarts
    /// the workload again rather than no-oping. On any failure the stored
    /// object is left unmodified.
    pub async fn restart(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<WorkloadRef, WorkloadError> {
        let mut workload = self.store.get(kind, namespace, name).await?;

        let stamp = self.clock.now().to_rfc3339();
        workload
            .pod_template_annotations
            .insert(RESTARTED_AT_ANNOTATION.to_string(), stamp);

        self.store.update(&workload).await?;

        Ok(workload)
    }
}
