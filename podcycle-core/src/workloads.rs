//! Workload kind dispatch over the Kubernetes API
//!
//! One generic list/fetch/update algorithm shared by every supported kind;
//! each kind contributes only its pod-template annotation access.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, StatefulSet};
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, ListParams, Patch, PatchParams};
use kube::{Client, ResourceExt};
use serde::de::DeserializeOwned;

use crate::client::K8sClient;
use crate::error::WorkloadError;
use crate::store::WorkloadStore;
use crate::types::{WorkloadKind, WorkloadRef};

/// Per-kind capability: a fixed kind tag plus pod-template annotation access
trait RestartableWorkload:
    kube::Resource<DynamicType = (), Scope = NamespaceResourceScope>
    + Clone
    + DeserializeOwned
    + std::fmt::Debug
    + Send
    + Sync
    + 'static
{
    const KIND: WorkloadKind;

    fn pod_template_annotations(&self) -> Option<&BTreeMap<String, String>>;
}

impl RestartableWorkload for Deployment {
    const KIND: WorkloadKind = WorkloadKind::Deployment;

    fn pod_template_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.as_ref()?.template.metadata.as_ref()?.annotations.as_ref()
    }
}

impl RestartableWorkload for StatefulSet {
    const KIND: WorkloadKind = WorkloadKind::StatefulSet;

    fn pod_template_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.as_ref()?.template.metadata.as_ref()?.annotations.as_ref()
    }
}

impl RestartableWorkload for DaemonSet {
    const KIND: WorkloadKind = WorkloadKind::DaemonSet;

    fn pod_template_annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.spec.as_ref()?.template.metadata.as_ref()?.annotations.as_ref()
    }
}

fn to_workload_ref<K: RestartableWorkload>(obj: &K) -> WorkloadRef {
    WorkloadRef {
        kind: K::KIND,
        namespace: obj.namespace().unwrap_or_default(),
        name: obj.name_any(),
        pod_template_annotations: obj.pod_template_annotations().cloned().unwrap_or_default(),
        resource_version: obj.resource_version(),
    }
}

/// `WorkloadStore` backed by a live cluster connection
#[derive(Clone)]
pub struct KubeWorkloadStore {
    client: Client,
}

impl KubeWorkloadStore {
    pub fn new(client: &K8sClient) -> Self {
        Self {
            client: client.inner().clone(),
        }
    }

    async fn list_kind<K: RestartableWorkload>(&self) -> Result<Vec<WorkloadRef>, WorkloadError> {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(WorkloadError::from_kube)?;

        Ok(list.items.iter().map(to_workload_ref).collect())
    }

    async fn get_kind<K: RestartableWorkload>(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<WorkloadRef, WorkloadError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let obj = api.get(name).await.map_err(WorkloadError::from_kube)?;

        Ok(to_workload_ref(&obj))
    }

    async fn update_kind<K: RestartableWorkload>(
        &self,
        workload: &WorkloadRef,
    ) -> Result<(), WorkloadError> {
        let api: Api<K> = Api::namespaced(self.client.clone(), &workload.namespace);

        // Carrying the fetched resourceVersion makes the API server reject
        // the write with 409 if the object changed since the fetch.
        let mut patch = serde_json::json!({
            "spec": {
                "template": {
                    "metadata": {
                        "annotations": workload.pod_template_annotations,
                    }
                }
            }
        });
        if let Some(version) = &workload.resource_version {
            patch["metadata"] = serde_json::json!({ "resourceVersion": version });
        }

        api.patch(&workload.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(WorkloadError::from_kube)?;

        Ok(())
    }
}

#[async_trait]
impl WorkloadStore for KubeWorkloadStore {
    async fn list_all(&self, kind: WorkloadKind) -> Result<Vec<WorkloadRef>, WorkloadError> {
        match kind {
            WorkloadKind::Deployment => self.list_kind::<Deployment>().await,
            WorkloadKind::StatefulSet => self.list_kind::<StatefulSet>().await,
            WorkloadKind::DaemonSet => self.list_kind::<DaemonSet>().await,
        }
    }

    async fn get(
        &self,
        kind: WorkloadKind,
        namespace: &str,
        name: &str,
    ) -> Result<WorkloadRef, WorkloadError> {
        match kind {
            WorkloadKind::Deployment => self.get_kind::<Deployment>(namespace, name).await,
            WorkloadKind::StatefulSet => self.get_kind::<StatefulSet>(namespace, name).await,
            WorkloadKind::DaemonSet => self.get_kind::<DaemonSet>(namespace, name).await,
        }
    }

    async fn update(&self, workload: &WorkloadRef) -> Result<(), WorkloadError> {
        match workload.kind {
            WorkloadKind::Deployment => self.update_kind::<Deployment>(workload).await,
            WorkloadKind::StatefulSet => self.update_kind::<StatefulSet>(workload).await,
            WorkloadKind::DaemonSet => self.update_kind::<DaemonSet>(workload).await,
        }
    }
}
