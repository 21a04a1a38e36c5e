use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{constants, metrics::MetricsPolicy, model::Error};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct OperatorConfig {
    pub hosted_control_plane: HostedControlPlaneRef,
    pub release_version: String,
    pub release_images: BTreeMap<String, String>,
    pub user_release_images: BTreeMap<String, String>,
    #[serde(default)]
    pub set_default_security_context: bool,
    #[serde(default)]
    pub metrics: MetricsPolicy,
    #[serde(default = "default_reconcile_frequency")]
    pub reconcile_frequency: u64,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Hash)]
pub struct HostedControlPlaneRef {
    pub name: String,
    pub namespace: String,
}

fn default_reconcile_frequency() -> u64 {
    constants::RECONCILE_FREQUENCY
}

impl OperatorConfig {
    /// Production reads the mounted config, any other environment a sample file in the working directory
    pub fn config_path(operator_environment: &str, current_dir: &Path) -> PathBuf {
        if operator_environment.eq("production") {
            PathBuf::from("/app/config/config.yaml")
        } else {
            current_dir.join(format!("sample_config-{operator_environment}.yaml"))
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        info!("Loading operator config from {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigReadError {
            path: path.display().to_string(),
            source,
        })?;
        let config: OperatorConfig = serde_yaml::from_str(&contents)?;
        if config.reconcile_frequency == 0 {
            return Err(Error::OperatorConfigError("reconcile_frequency must be greater than zero".to_owned()));
        }
        Ok(config)
    }
}
