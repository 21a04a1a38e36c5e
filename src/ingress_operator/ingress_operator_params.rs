use kube::ResourceExt;
use tracing::debug;

use crate::{
    constants,
    deployment_config::DeploymentConfig,
    hosted_control_plane::{HostedControlPlane, PlatformType, ProxySpec},
    image_provider::ReleaseImageProvider,
    proxy::{self, ProxyEnv},
};

/// Everything the ingress operator workload is rendered from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngressOperatorParams {
    pub ingress_operator_image: String,
    pub ingress_canary_image: String,
    pub haproxy_router_image: String,
    pub release_version: String,
    pub token_minter_image: String,
    pub availability_prober_image: String,
    pub proxy_image: String,
    pub platform: PlatformType,
    pub deployment_config: DeploymentConfig,
    pub proxy_config: Option<ProxySpec>,
    pub no_proxy: String,
    /// Credentials file of the ingress managed identity, only set on managed Azure
    pub azure_credentials_filepath: Option<String>,
    pub management_proxy_env: ProxyEnv,
}

impl IngressOperatorParams {
    /// Flattens the hosted control plane and both release payloads into the parameters of the
    /// ingress operator workload.
    ///
    /// The canary and router run on behalf of the hosted cluster's users and therefore come from
    /// the user release payload, which may be at a different version than the control plane.
    pub fn new(
        hcp: &HostedControlPlane,
        version: &str,
        release_images: &dyn ReleaseImageProvider,
        user_release_images: &dyn ReleaseImageProvider,
        set_default_security_context: bool,
        platform: PlatformType,
    ) -> Self {
        let mut params = IngressOperatorParams {
            ingress_operator_image: release_images.get_image(constants::IMAGE_CLUSTER_INGRESS_OPERATOR),
            ingress_canary_image: user_release_images.get_image(constants::IMAGE_CLUSTER_INGRESS_OPERATOR),
            haproxy_router_image: user_release_images.get_image(constants::IMAGE_HAPROXY_ROUTER),
            release_version: version.to_owned(),
            token_minter_image: release_images.get_image(constants::IMAGE_TOKEN_MINTER),
            proxy_image: release_images.get_image(constants::IMAGE_CONTROL_PLANE_OPERATOR),
            availability_prober_image: release_images.get_image(constants::IMAGE_AVAILABILITY_PROBER),
            platform,
            ..IngressOperatorParams::default()
        };

        params.azure_credentials_filepath = match platform {
            PlatformType::Azure => hcp
                .spec
                .platform
                .azure
                .as_ref()
                .and_then(|azure| azure.managed_identities.as_ref())
                .map(|identities| identities.control_plane.ingress.credentials_secret_name.as_str())
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
            PlatformType::Aws
            | PlatformType::IbmCloud
            | PlatformType::KubeVirt
            | PlatformType::Agent
            | PlatformType::OpenStack
            | PlatformType::PowerVs
            | PlatformType::None => None,
        };

        if let Some(configuration) = &hcp.spec.configuration {
            params.proxy_config = configuration.proxy.clone();
            params.no_proxy = proxy::default_no_proxy(hcp);
        }

        params.deployment_config.scheduling.priority_class = hcp
            .annotations()
            .get(constants::ANNOTATION_CONTROL_PLANE_PRIORITY_CLASS)
            .filter(|priority_class| !priority_class.is_empty())
            .map_or(constants::DEFAULT_PRIORITY_CLASS.to_owned(), |priority_class| priority_class.to_owned());
        params.deployment_config.set_restart_annotation(&hcp.metadata);
        params.deployment_config.set_defaults(hcp, Some(1));
        params.deployment_config.set_default_security_context = set_default_security_context;

        debug!("Derived ingress operator parameters for {} on platform {}", hcp.name_any(), platform);
        params
    }

    pub fn with_management_proxy_env(mut self, management_proxy_env: ProxyEnv) -> Self {
        self.management_proxy_env = management_proxy_env;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosted_control_plane::{
        AzurePlatformSpec, AzureResourceManagedIdentities, ClusterConfiguration, ControlPlaneManagedIdentities, HostedControlPlaneSpec, ManagedIdentity,
        PlatformSpec,
    };
    use crate::image_provider::ReleaseImageCatalog;
    use std::collections::BTreeMap;

    fn catalogs() -> (ReleaseImageCatalog, ReleaseImageCatalog) {
        let release = ReleaseImageCatalog::new(BTreeMap::from([
            ("cluster-ingress-operator".to_owned(), "release/ingress-operator".to_owned()),
            ("token-minter".to_owned(), "release/token-minter".to_owned()),
            ("control-plane-operator".to_owned(), "release/cpo".to_owned()),
            ("availability-prober".to_owned(), "release/prober".to_owned()),
            ("haproxy-router".to_owned(), "release/router".to_owned()),
        ]));
        let user_release = ReleaseImageCatalog::new(BTreeMap::from([
            ("cluster-ingress-operator".to_owned(), "user/ingress-operator".to_owned()),
            ("haproxy-router".to_owned(), "user/router".to_owned()),
        ]));
        (release, user_release)
    }

    fn azure_hcp() -> HostedControlPlane {
        let spec = HostedControlPlaneSpec {
            platform: PlatformSpec {
                r#type: PlatformType::Azure,
                azure: Some(AzurePlatformSpec {
                    managed_identities: Some(AzureResourceManagedIdentities {
                        control_plane: ControlPlaneManagedIdentities {
                            ingress: ManagedIdentity {
                                credentials_secret_name: "ingress-creds.json".to_owned(),
                            },
                        },
                    }),
                }),
            },
            ..HostedControlPlaneSpec::default()
        };
        let mut hcp = HostedControlPlane::new("hcp", spec);
        hcp.metadata.namespace = Some("clusters-demo".to_owned());
        hcp
    }

    #[test]
    fn test_images_come_from_their_catalogs() {
        let (release, user_release) = catalogs();
        let params = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, false, PlatformType::Aws);
        assert_eq!(params.ingress_operator_image, "release/ingress-operator");
        assert_eq!(params.ingress_canary_image, "user/ingress-operator");
        assert_eq!(params.haproxy_router_image, "user/router");
        assert_eq!(params.token_minter_image, "release/token-minter");
        assert_eq!(params.proxy_image, "release/cpo");
        assert_eq!(params.availability_prober_image, "release/prober");
        assert_eq!(params.release_version, "4.16.0");
    }

    #[test]
    fn test_credentials_only_captured_on_azure() {
        let (release, user_release) = catalogs();
        let azure = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, false, PlatformType::Azure);
        assert_eq!(azure.azure_credentials_filepath.as_deref(), Some("ingress-creds.json"));
        let aws = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, false, PlatformType::Aws);
        assert_eq!(aws.azure_credentials_filepath, None);
    }

    #[test]
    fn test_empty_credentials_secret_name_is_ignored() {
        let (release, user_release) = catalogs();
        let mut hcp = azure_hcp();
        if let Some(identities) = hcp.spec.platform.azure.as_mut().and_then(|azure| azure.managed_identities.as_mut()) {
            identities.control_plane.ingress.credentials_secret_name = String::new();
        }
        let params = IngressOperatorParams::new(&hcp, "4.16.0", &release, &user_release, false, PlatformType::Azure);
        assert_eq!(params.azure_credentials_filepath, None);
    }

    #[test]
    fn test_no_configuration_means_no_proxy() {
        let (release, user_release) = catalogs();
        let params = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, false, PlatformType::Azure);
        assert_eq!(params.proxy_config, None);
        assert_eq!(params.no_proxy, "");
    }

    #[test]
    fn test_configured_proxy_is_copied() {
        let (release, user_release) = catalogs();
        let mut hcp = azure_hcp();
        hcp.spec.configuration = Some(ClusterConfiguration {
            proxy: Some(ProxySpec {
                http_proxy: "http://p:3128".to_owned(),
                https_proxy: "http://p:3129".to_owned(),
                no_proxy: "example.com".to_owned(),
            }),
        });
        let params = IngressOperatorParams::new(&hcp, "4.16.0", &release, &user_release, false, PlatformType::Azure);
        assert_eq!(params.proxy_config.unwrap().http_proxy, "http://p:3128");
        assert!(params.no_proxy.ends_with(",169.254.169.254,example.com"));
    }

    #[test]
    fn test_priority_class_default_and_override() {
        let (release, user_release) = catalogs();
        let params = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, true, PlatformType::Azure);
        assert_eq!(params.deployment_config.scheduling.priority_class, "hypershift-control-plane");
        assert!(params.deployment_config.set_default_security_context);
        assert_eq!(params.deployment_config.replicas, 1);

        let mut hcp = azure_hcp();
        hcp.metadata.annotations = Some(BTreeMap::from([(
            "hypershift.openshift.io/control-plane-priority-class".to_owned(),
            "critical".to_owned(),
        )]));
        let params = IngressOperatorParams::new(&hcp, "4.16.0", &release, &user_release, false, PlatformType::Azure);
        assert_eq!(params.deployment_config.scheduling.priority_class, "critical");
    }

    #[test]
    fn test_with_management_proxy_env() {
        let (release, user_release) = catalogs();
        let proxy_env = ProxyEnv {
            http_proxy: Some("http://mgmt:3128".to_owned()),
            ..ProxyEnv::default()
        };
        let params = IngressOperatorParams::new(&azure_hcp(), "4.16.0", &release, &user_release, false, PlatformType::None)
            .with_management_proxy_env(proxy_env.clone());
        assert_eq!(params.management_proxy_env, proxy_env);
    }
}
