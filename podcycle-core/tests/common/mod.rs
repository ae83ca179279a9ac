//! Common test utilities
//!
//! In-memory workload store and deterministic clock for reconciler tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use podcycle_core::{Clock, WorkloadError, WorkloadKind, WorkloadRef, WorkloadStore};

struct Entry {
    workload: WorkloadRef,
    version: u64,
}

#[derive(Default)]
struct State {
    objects: Vec<Entry>,
    /// Still visible in listings but gone by fetch time
    ghosts: Vec<WorkloadRef>,
    fail_listing: Option<WorkloadKind>,
    conflict_on_update: Vec<(WorkloadKind, String, String)>,
    listed_kinds: Vec<WorkloadKind>,
    updates: Vec<WorkloadRef>,
}

/// In-memory `WorkloadStore` with scriptable failure modes
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<State>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, kind: WorkloadKind, namespace: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.objects.push(Entry {
            workload: WorkloadRef {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
                pod_template_annotations: BTreeMap::new(),
                resource_version: Some("1".to_string()),
            },
            version: 1,
        });
    }

    /// Make listing this kind fail
    pub fn fail_listing(&self, kind: WorkloadKind) {
        self.state.lock().unwrap().fail_listing = Some(kind);
    }

    /// Keep the workload visible in listings but make fetches miss it
    pub fn vanish(&self, kind: WorkloadKind, namespace: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(pos) = state
            .objects
            .iter()
            .position(|e| identity_matches(&e.workload, kind, namespace, name))
        {
            let entry = state.objects.remove(pos);
            state.ghosts.push(entry.workload);
        }
    }

    /// Make updates of this workload fail with a conflict
    pub fn conflict_on_update(&self, kind: WorkloadKind, namespace: &str, name: &str) {
        self.state.lock().unwrap().conflict_on_update.push((
            kind,
            namespace.to_string(),
            name.to_string(),
        ));
    }

    /// Simulate a concurrent external edit bumping the stored version
    pub fn external_edit(&self, kind: WorkloadKind, namespace: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .objects
            .iter_mut()
            .find(|e| identity_matches(&e.workload, kind, namespace, name))
            .expect("no such workload");
        entry.version += 1;
        entry.workload.resource_version = Some(entry.version.to_string());
    }

    pub fn contains(&self, kind: WorkloadKind, namespace: &str, name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .objects
            .iter()
            .any(|e| identity_matches(&e.workload, kind, namespace, name))
    }

    /// Stored pod-template annotations of one workload
    pub fn annotations(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> BTreeMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .objects
            .iter()
            .find(|e| identity_matches(&e.workload, kind, namespace, name))
            .expect("no such workload")
            .workload
            .pod_template_annotations
            .clone()
    }

    /// Successful update calls, in order
    pub fn updated(&self) -> Vec<WorkloadRef> {
        self.state.lock().unwrap().updates.clone()
    }

    /// Kinds listed so far, in order
    pub fn listed_kinds(&self) -> Vec<WorkloadKind> {
        self.state.lock().unwrap().listed_kinds.clone()
    }
}

fn identity_matches(workload: &WorkloadRef, kind: WorkloadKind, namespace: &str, name: &str) -> bool {
    workload.kind == kind && workload.namespace == namespace && workload.name == name
}

#[async_trait]
impl WorkloadStore for FakeStore {
    async fn list_all(&self, kind: WorkloadKind) -> Result<Vec<WorkloadRef>, WorkloadError> {
        let mut state = self.state.lock().unwrap();
        state.listed_kinds.push(kind);

        if state.fail_listing == Some(kind) {
            return Err(WorkloadError::Api("listing failed".to_string()));
        }

        Ok(state
            .objects
            .iter()
            .map(|e| &e.workload)
            .chain(state.ghosts.iter())
            .filter(|w| w.kind == kind)
            .cloned()
            .collect())
    }

    async fn get(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<WorkloadRef, WorkloadError> {
        self.state
            .lock()
            .unwrap()
            .objects
            .iter()
            .find(|e| identity_matches(&e.workload, kind, namespace, name))
            .map(|e| e.workload.clone())
            .ok_or(WorkloadError::NotFound)
    }

    async fn update(&self, workload: &WorkloadRef) -> Result<(), WorkloadError> {
        let mut state = self.state.lock().unwrap();

        if state.conflict_on_update.iter().any(|(kind, namespace, name)| {
            identity_matches(workload, *kind, namespace, name)
        }) {
            return Err(WorkloadError::Conflict(
                "the object has been modified".to_string(),
            ));
        }

        let entry = state
            .objects
            .iter_mut()
            .find(|e| {
                identity_matches(&e.workload, workload.kind, &workload.namespace, &workload.name)
            })
            .ok_or(WorkloadError::NotFound)?;

        if workload.resource_version != entry.workload.resource_version {
            return Err(WorkloadError::Conflict(
                "resource version mismatch".to_string(),
            ));
        }

        entry.version += 1;
        entry.workload.pod_template_annotations = workload.pod_template_annotations.clone();
        entry.workload.resource_version = Some(entry.version.to_string());
        state.updates.push(workload.clone());

        Ok(())
    }
}

/// Deterministic clock advancing one second per reading
#[derive(Clone)]
pub struct StepClock {
    base: DateTime<Utc>,
    ticks: Arc<Mutex<i64>>,
}

impl StepClock {
    pub fn new() -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ticks: Arc::new(Mutex::new(0)),
        }
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().unwrap();
        *ticks += 1;
        self.base + Duration::seconds(*ticks)
    }
}
