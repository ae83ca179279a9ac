///! CLI configuration management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name substring selecting workloads to restart
    pub default_token: String,
    /// Output format (table, json, yaml)
    pub default_output: String,
    /// Kubeconfig path; unset means $KUBECONFIG or ~/.kube/config
    pub kubeconfig: Option<String>,
    /// Kubeconfig context; unset means current-context
    pub context: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_token: "database".to_string(),
            default_output: "table".to_string(),
            kubeconfig: None,
            context: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/podcycle/cli.toml"))
    }
}
