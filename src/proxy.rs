use k8s_openapi::api::core::v1::EnvVar;
use std::env;

use crate::{
    constants,
    hosted_control_plane::{HostedControlPlane, PlatformType},
    utils,
};

/// Proxy environment of the process rendering the workload. Components that must reach the
/// management cluster's own egress proxy inherit these values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyEnv {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Option<String>,
}

impl ProxyEnv {
    pub fn from_process_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
        Self {
            http_proxy: read(constants::ENV_HTTP_PROXY),
            https_proxy: read(constants::ENV_HTTPS_PROXY),
            no_proxy: read(constants::ENV_NO_PROXY),
        }
    }
}

/// Upserts the management proxy variables into `env_vars`
pub fn set_env_vars(env_vars: &mut Vec<EnvVar>, proxy_env: &ProxyEnv) {
    let entries = [
        (constants::ENV_HTTP_PROXY, &proxy_env.http_proxy),
        (constants::ENV_HTTPS_PROXY, &proxy_env.https_proxy),
        (constants::ENV_NO_PROXY, &proxy_env.no_proxy),
    ];
    for (name, value) in entries {
        if let Some(value) = value {
            utils::upsert_env_var(env_vars, name, value);
        }
    }
}

/// Computes the effective no-proxy list for components of the hosted control plane.
///
/// Loopback and in-cluster names come first, then the cluster networks, the cloud metadata
/// endpoint on platforms that have one and finally the user's own exclusions. Duplicates are
/// dropped keeping the first occurrence so the result is stable across invocations.
pub fn default_no_proxy(hcp: &HostedControlPlane) -> String {
    let mut entries: Vec<String> = ["127.0.0.1", "localhost", ".svc", ".cluster.local"].iter().map(|entry| entry.to_string()).collect();

    let networking = &hcp.spec.networking;
    for network in networking.machine_network.iter().chain(&networking.cluster_network).chain(&networking.service_network) {
        entries.push(network.cidr.to_owned());
    }

    match hcp.spec.platform.r#type {
        PlatformType::Aws | PlatformType::Azure => entries.push(constants::CLOUD_METADATA_ADDRESS.to_owned()),
        PlatformType::IbmCloud | PlatformType::KubeVirt | PlatformType::Agent | PlatformType::OpenStack | PlatformType::PowerVs | PlatformType::None => {}
    }

    if let Some(proxy) = hcp.spec.configuration.as_ref().and_then(|configuration| configuration.proxy.as_ref()) {
        entries.extend(proxy.no_proxy.split(',').map(str::trim).filter(|entry| !entry.is_empty()).map(str::to_owned));
    }

    let mut unique: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }
    unique.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosted_control_plane::{ClusterConfiguration, HostedControlPlaneSpec, NetworkEntry, PlatformSpec, ProxySpec};

    fn hcp(platform: PlatformType, user_no_proxy: Option<&str>) -> HostedControlPlane {
        let mut spec = HostedControlPlaneSpec {
            platform: PlatformSpec { r#type: platform, azure: None },
            ..HostedControlPlaneSpec::default()
        };
        spec.networking.machine_network = vec![NetworkEntry { cidr: "10.0.0.0/16".to_owned() }];
        spec.networking.service_network = vec![NetworkEntry { cidr: "172.30.0.0/16".to_owned() }];
        spec.configuration = user_no_proxy.map(|no_proxy| ClusterConfiguration {
            proxy: Some(ProxySpec { no_proxy: no_proxy.to_owned(), ..ProxySpec::default() }),
        });
        HostedControlPlane::new("hcp", spec)
    }

    #[test]
    fn test_default_no_proxy_aws_includes_metadata_endpoint() {
        assert_eq!(
            default_no_proxy(&hcp(PlatformType::Aws, None)),
            "127.0.0.1,localhost,.svc,.cluster.local,10.0.0.0/16,172.30.0.0/16,169.254.169.254"
        );
    }

    #[test]
    fn test_default_no_proxy_appends_user_entries_without_duplicates() {
        let no_proxy = default_no_proxy(&hcp(PlatformType::KubeVirt, Some(" example.com,localhost,,10.0.0.0/16 ")));
        assert_eq!(no_proxy, "127.0.0.1,localhost,.svc,.cluster.local,10.0.0.0/16,172.30.0.0/16,example.com");
    }

    #[test]
    fn test_set_env_vars_upserts_only_present_values() {
        let mut env_vars = vec![EnvVar {
            name: constants::ENV_HTTP_PROXY.to_owned(),
            value: Some("http://old:1".to_owned()),
            ..EnvVar::default()
        }];
        let proxy_env = ProxyEnv {
            http_proxy: Some("http://mgmt:3128".to_owned()),
            https_proxy: None,
            no_proxy: Some(".local".to_owned()),
        };
        set_env_vars(&mut env_vars, &proxy_env);
        assert_eq!(env_vars.len(), 2);
        assert_eq!(env_vars[0].value.as_deref(), Some("http://mgmt:3128"));
        assert_eq!(env_vars[1].name, constants::ENV_NO_PROXY);
    }

    #[test]
    fn test_set_env_vars_empty_proxy_env_is_noop() {
        let mut env_vars = Vec::new();
        set_env_vars(&mut env_vars, &ProxyEnv::default());
        assert!(env_vars.is_empty());
    }
}
