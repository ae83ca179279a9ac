//! Multi-kind reconcile pass
//!
//! Drives listing, selection, and restart triggering across every supported
//! workload kind, accumulating one report per pass.

use tokio::sync::watch;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::{ReconcileError, WorkloadError};
use crate::restart::RestartTrigger;
use crate::selector::NameSelector;
use crate::store::WorkloadStore;
use crate::types::{RestartFailure, RestartReport, WorkloadKind, WorkloadRef};

/// Receives per-instance outcomes as they occur, for live operator feedback
pub trait ProgressObserver: Send + Sync {
    /// A workload's rollout trigger was written
    fn restarted(&self, workload: &WorkloadRef);

    /// A matched workload could not be restarted
    fn failed(&self, workload: &WorkloadRef, error: &WorkloadError);
}

/// Reports per-instance outcomes through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn restarted(&self, workload: &WorkloadRef) {
        info!("restarted {}", workload);
    }

    fn failed(&self, workload: &WorkloadRef, error: &WorkloadError) {
        warn!("failed to restart {}: {}", workload, error);
    }
}

/// Single linear pass over all supported kinds
///
/// Holds no state between invocations; every run lists fresh instances.
pub struct Reconciler<S, Sel, C> {
    store: S,
    selector: Sel,
    trigger: RestartTrigger<S, C>,
}

impl<S, Sel, C> Reconciler<S, Sel, C>
where
    S: WorkloadStore + Clone,
    Sel: NameSelector,
    C: Clock,
{
    pub fn new(store: S, selector: Sel, clock: C) -> Self {
        Self {
            trigger: RestartTrigger::new(store.clone(), clock),
            store,
            selector,
        }
    }

    /// Run one pass over all supported kinds
    ///
    /// A listing failure aborts the pass with no partial report. Per-instance
    /// failures are recorded and the pass continues. A `true` on the shutdown
    /// channel stops the pass before the next workload is touched.
    pub async fn run(
        &self,
        shutdown: &watch::Receiver<bool>,
        observer: &dyn ProgressObserver,
    ) -> Result<RestartReport, ReconcileError> {
        let mut report = RestartReport::default();

        for kind in WorkloadKind::ALL {
            if *shutdown.borrow() {
                return Err(ReconcileError::Cancelled);
            }

            let workloads = self
                .store
                .list_all(kind)
                .await
                .map_err(|source| ReconcileError::Listing { kind, source })?;
            info!("listed {} {} workloads", workloads.len(), kind);

            for workload in workloads {
                if *shutdown.borrow() {
                    return Err(ReconcileError::Cancelled);
                }
                if !self.selector.matches(&workload.name) {
                    continue;
                }

                report.matched += 1;
                match self
                    .trigger
                    .restart(kind, &workload.namespace, &workload.name)
                    .await
                {
                    Ok(updated) => {
                        report.restarted += 1;
                        observer.restarted(&updated);
                    }
                    Err(error) => {
                        observer.failed(&workload, &error);
                        report.failures.push(RestartFailure { workload, error });
                    }
                }
            }
        }

        Ok(report)
    }
}
