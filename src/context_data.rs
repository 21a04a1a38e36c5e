use std::env;

use kube::Client;

use crate::{constants, model::Error, operator_config::OperatorConfig, proxy::ProxyEnv};

/// Context shared by every sync pass
#[derive(Clone)]
pub struct ContextData {
    /// Kubernetes client to make Kubernetes API requests with. Required for K8S resource management.
    pub client: Client,

    pub config: OperatorConfig,

    /// Proxy settings of this process, handed down to the konnectivity proxy sidecar
    pub management_proxy_env: ProxyEnv,
}

impl ContextData {
    pub fn new(client: Client) -> Result<Self, Error> {
        let operator_environment = env::var(constants::OPERATOR_ENVIRONMENT).unwrap_or_else(|_| "production".to_owned());
        let current_dir = env::current_dir().map_err(|source| Error::ConfigReadError {
            path: ".".to_owned(),
            source,
        })?;
        let config = OperatorConfig::load(OperatorConfig::config_path(&operator_environment, &current_dir))?;

        Ok(ContextData {
            client,
            config,
            management_proxy_env: ProxyEnv::from_process_env(),
        })
    }
}
