//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with connection helpers for kubeconfig and
//! in-cluster environments.

use std::path::{Path, PathBuf};

use k8s_openapi::api::core::v1::Namespace;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::error::ClientError;

/// Wrapper around the kube-rs Client with the resolved API server URL
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl K8sClient {
    /// Create a client from kubeconfig YAML with an optional context
    pub async fn from_kubeconfig(
        kubeconfig_yaml: &str,
        context: Option<&str>,
    ) -> Result<Self, ClientError> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            ClientError::InvalidKubeconfig(format!("failed to parse kubeconfig: {}", e))
        })?;

        let api_server = Self::extract_api_server(&kubeconfig, context)?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| ClientError::InvalidKubeconfig(format!("failed to create config: {}", e)))?;

        let client = Client::try_from(config)
            .map_err(|e| ClientError::InvalidKubeconfig(format!("failed to create client: {}", e)))?;

        Ok(Self { inner: client, api_server })
    }

    /// Create a client from a kubeconfig file on disk
    pub async fn from_kubeconfig_file(
        path: &Path,
        context: Option<&str>,
    ) -> Result<Self, ClientError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ClientError::ReadKubeconfig {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_kubeconfig(&yaml, context).await
    }

    /// Create a client from `$KUBECONFIG`, falling back to `~/.kube/config`
    pub async fn from_default_kubeconfig(context: Option<&str>) -> Result<Self, ClientError> {
        Self::from_kubeconfig_file(&Self::default_kubeconfig_path()?, context).await
    }

    /// Create a client from in-cluster configuration (for running inside K8s)
    pub async fn from_incluster() -> Result<Self, ClientError> {
        let config = Config::incluster().map_err(|e| {
            ClientError::InvalidKubeconfig(format!("failed to get in-cluster config: {}", e))
        })?;

        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| ClientError::InvalidKubeconfig(format!("failed to create client: {}", e)))?;

        Ok(Self { inner: client, api_server })
    }

    fn default_kubeconfig_path() -> Result<PathBuf, ClientError> {
        if let Ok(path) = std::env::var("KUBECONFIG") {
            return Ok(PathBuf::from(path));
        }

        let home = std::env::var("HOME").map_err(|_| {
            ClientError::InvalidKubeconfig("neither $KUBECONFIG nor $HOME is set".to_string())
        })?;

        Ok(PathBuf::from(home).join(".kube").join("config"))
    }

    /// Extract API server URL from kubeconfig
    fn extract_api_server(
        kubeconfig: &Kubeconfig,
        context_name: Option<&str>,
    ) -> Result<String, ClientError> {
        let context_name = context_name
            .map(String::from)
            .or_else(|| kubeconfig.current_context.clone())
            .ok_or_else(|| {
                ClientError::InvalidKubeconfig("no context specified and no current-context".into())
            })?;

        let context = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .ok_or_else(|| {
                ClientError::InvalidKubeconfig(format!("context '{}' not found", context_name))
            })?;

        let cluster_name = context
            .context
            .as_ref()
            .map(|c| c.cluster.as_str())
            .ok_or_else(|| {
                ClientError::InvalidKubeconfig("context has no cluster reference".into())
            })?;

        let cluster = kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == cluster_name)
            .ok_or_else(|| {
                ClientError::InvalidKubeconfig(format!("cluster '{}' not found", cluster_name))
            })?;

        cluster
            .cluster
            .as_ref()
            .and_then(|c| c.server.clone())
            .ok_or_else(|| ClientError::InvalidKubeconfig("cluster has no server URL".into()))
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get the API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Check that the cluster answers a basic list call
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let namespaces: Api<Namespace> = Api::all(self.inner.clone());
        namespaces
            .list(&ListParams::default().limit(1))
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG_YAML: &str = r#"
apiVersion: v1
kind: Config
current-context: main
clusters:
  - name: prod
    cluster:
      server: https://10.0.0.1:6443
contexts:
  - name: main
    context:
      cluster: prod
      user: admin
users:
  - name: admin
    user: {}
"#;

    #[test]
    fn extracts_api_server_from_current_context() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG_YAML).unwrap();
        let api_server = K8sClient::extract_api_server(&kubeconfig, None).unwrap();
        assert_eq!(api_server, "https://10.0.0.1:6443");
    }

    #[test]
    fn unknown_context_is_rejected() {
        let kubeconfig = Kubeconfig::from_yaml(KUBECONFIG_YAML).unwrap();
        let err = K8sClient::extract_api_server(&kubeconfig, Some("staging")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidKubeconfig(_)));
    }
}
