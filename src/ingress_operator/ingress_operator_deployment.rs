use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStrategy};
use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, Container, ContainerPort, EmptyDirVolumeSource, KeyToPath, PodSpec, PodTemplateSpec, ResourceRequirements, SecretVolumeSource, Volume,
    VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use kube::core::GroupVersionKind;
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::debug;

use crate::{
    availability_prober, azure, constants,
    hosted_control_plane::{PlatformType, ProxySpec},
    ingress_operator::ingress_operator_params::IngressOperatorParams,
    proxy::{self, ProxyEnv},
    utils,
};

/// Platform specific additions to the ingress operator pod. At most one applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformExtension {
    /// The platform authenticates workloads with projected service account tokens, which a
    /// sidecar mints and refreshes for the operator.
    TokenMinter,
    /// The platform authenticates through a managed identity whose credentials file is
    /// projected by the secret store CSI driver.
    ManagedIdentity { credentials_file: String },
    None,
}

impl PlatformExtension {
    pub fn for_platform(platform: PlatformType, azure_credentials_filepath: Option<&str>) -> Self {
        match platform {
            PlatformType::Aws => PlatformExtension::TokenMinter,
            PlatformType::Azure => match azure_credentials_filepath {
                Some(credentials_file) => PlatformExtension::ManagedIdentity {
                    credentials_file: credentials_file.to_owned(),
                },
                None => PlatformExtension::None,
            },
            PlatformType::IbmCloud | PlatformType::KubeVirt | PlatformType::Agent | PlatformType::OpenStack | PlatformType::PowerVs | PlatformType::None => {
                PlatformExtension::None
            }
        }
    }
}

/// Renders the desired ingress operator deployment into `deployment`.
///
/// Only the resources of the operator container survive from the previous revision; the rest
/// of the spec is rebuilt from `params`. The object metadata is left alone.
///
/// # Arguments
/// - `deployment` - Live deployment, or an empty one when it does not exist yet
/// - `params` - Images, proxy settings and scheduling overlay derived from the hosted control plane
/// - `platform` - Platform of the hosted control plane, used for the in-cluster API server URL
///
pub fn reconcile_deployment(deployment: &mut Deployment, params: &IngressOperatorParams, platform: PlatformType) {
    let resources = preserved_resources(deployment);
    let extension = PlatformExtension::for_platform(params.platform, params.azure_credentials_filepath.as_deref());

    let mut pod_spec = PodSpec {
        automount_service_account_token: Some(false),
        containers: vec![
            ingress_operator_container(params, resources),
            konnectivity_proxy_container(&params.proxy_image, params.proxy_config.as_ref(), &params.no_proxy, &params.management_proxy_env),
        ],
        volumes: Some(build_volumes()),
        ..PodSpec::default()
    };

    if extension == PlatformExtension::TokenMinter {
        add_token_minter(&mut pod_spec, &params.token_minter_image);
    }

    availability_prober::inject(&utils::in_cluster_kas_ready_url(platform), &params.availability_prober_image, &mut pod_spec, |opts| {
        opts.kubeconfig_volume_name = Some(constants::VOLUME_INGRESS_OPERATOR_KUBECONFIG.to_owned());
        opts.required_apis = vec![GroupVersionKind::gvk(constants::ROUTE_API_GROUP, constants::ROUTE_API_VERSION, constants::ROUTE_API_KIND)];
    });

    if let PlatformExtension::ManagedIdentity { credentials_file } = &extension {
        add_managed_identity(&mut pod_spec, credentials_file);
    }

    deployment.spec = Some(DeploymentSpec {
        replicas: Some(1),
        selector: LabelSelector {
            match_labels: Some(utils::selector_labels(constants::OPERATOR_NAME)),
            ..LabelSelector::default()
        },
        // Old and new pods must never share the kubeconfig session
        strategy: Some(DeploymentStrategy {
            type_: Some("Recreate".to_owned()),
            ..DeploymentStrategy::default()
        }),
        template: PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: Some(utils::common_labels(constants::OPERATOR_NAME)),
                annotations: Some(BTreeMap::from([(
                    constants::ANNOTATION_WORKLOAD_MANAGEMENT.to_owned(),
                    constants::WORKLOAD_MANAGEMENT_PREFERRED.to_owned(),
                )])),
                ..ObjectMeta::default()
            }),
            spec: Some(pod_spec),
        },
        ..DeploymentSpec::default()
    });

    params.deployment_config.apply_to(deployment);
    debug!("Reconciled deployment {} with platform extension {:?}", deployment.name_any(), extension);
}

/// Resources of the operator container in the previous revision, if anyone set them,
/// otherwise the default requests
fn preserved_resources(deployment: &Deployment) -> ResourceRequirements {
    let previous = deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.template.spec.as_ref())
        .and_then(|pod_spec| utils::find_container(constants::INGRESS_OPERATOR_CONTAINER_NAME, &pod_spec.containers))
        .and_then(|container| container.resources.as_ref())
        .filter(|resources| {
            resources.requests.as_ref().map_or(false, |requests| !requests.is_empty())
                || resources.limits.as_ref().map_or(false, |limits| !limits.is_empty())
        });
    match previous {
        Some(resources) => resources.clone(),
        None => requests(constants::INGRESS_OPERATOR_CPU_REQUEST, constants::INGRESS_OPERATOR_MEMORY_REQUEST),
    }
}

fn requests(cpu: &str, memory: &str) -> ResourceRequirements {
    let mut requests: BTreeMap<String, Quantity> = BTreeMap::new();
    requests.insert("cpu".to_owned(), Quantity(cpu.to_owned()));
    requests.insert("memory".to_owned(), Quantity(memory.to_owned()));
    ResourceRequirements {
        requests: Some(requests),
        ..ResourceRequirements::default()
    }
}

fn volume_mount(name: &str, mount_path: &str) -> VolumeMount {
    VolumeMount {
        name: name.to_owned(),
        mount_path: mount_path.to_owned(),
        ..VolumeMount::default()
    }
}

pub fn ingress_operator_container(params: &IngressOperatorParams, resources: ResourceRequirements) -> Container {
    let local_proxy = format!("http://127.0.0.1:{}", constants::KONNECTIVITY_PROXY_PORT);
    Container {
        name: constants::INGRESS_OPERATOR_CONTAINER_NAME.to_owned(),
        image: Some(params.ingress_operator_image.to_owned()),
        image_pull_policy: Some("IfNotPresent".to_owned()),
        command: Some(vec![
            "ingress-operator".to_owned(),
            "start".to_owned(),
            "--namespace".to_owned(),
            constants::INGRESS_OPERATOR_NAMESPACE.to_owned(),
            "--image".to_owned(),
            format!("$({})", constants::ENV_IMAGE),
            "--canary-image".to_owned(),
            format!("$({})", constants::ENV_CANARY_IMAGE),
            "--release-version".to_owned(),
            format!("$({})", constants::ENV_RELEASE_VERSION),
            "--metrics-listen-addr".to_owned(),
            format!("0.0.0.0:{}", constants::INGRESS_OPERATOR_METRICS_PORT),
        ]),
        env: Some(vec![
            utils::env_var(constants::ENV_RELEASE_VERSION, &params.release_version),
            utils::env_var(constants::ENV_IMAGE, &params.haproxy_router_image),
            utils::env_var(constants::ENV_CANARY_IMAGE, &params.ingress_canary_image),
            utils::env_var(constants::ENV_KUBECONFIG, constants::KUBECONFIG_PATH),
            utils::env_var(constants::ENV_HTTP_PROXY, &local_proxy),
            utils::env_var(constants::ENV_HTTPS_PROXY, &local_proxy),
            utils::env_var(constants::ENV_NO_PROXY, constants::KUBE_APISERVER_SERVICE_NAME),
        ]),
        resources: Some(resources),
        termination_message_policy: Some("FallbackToLogsOnError".to_owned()),
        volume_mounts: Some(vec![volume_mount(constants::VOLUME_INGRESS_OPERATOR_KUBECONFIG, constants::KUBECONFIG_DIR)]),
        ..Container::default()
    }
}

/// Egress proxy every outbound call of the operator goes through. It is the only container
/// talking to the cluster-wide proxy directly.
pub fn konnectivity_proxy_container(proxy_image: &str, proxy_config: Option<&ProxySpec>, no_proxy: &str, management_proxy_env: &ProxyEnv) -> Container {
    let mut args = vec!["run".to_owned(), "--connect-directly-to-cloud-apis".to_owned()];
    if let Some(proxy_config) = proxy_config {
        args.extend([
            "--http-proxy".to_owned(),
            proxy_config.http_proxy.to_owned(),
            "--https-proxy".to_owned(),
            proxy_config.https_proxy.to_owned(),
            "--no-proxy".to_owned(),
            no_proxy.to_owned(),
        ]);
    }
    let mut env = vec![utils::env_var(constants::ENV_KUBECONFIG, constants::KUBECONFIG_PATH)];
    proxy::set_env_vars(&mut env, management_proxy_env);

    Container {
        name: constants::KONNECTIVITY_PROXY_CONTAINER_NAME.to_owned(),
        image: Some(proxy_image.to_owned()),
        command: Some(vec![constants::CONTROL_PLANE_OPERATOR_BINARY.to_owned(), "konnectivity-https-proxy".to_owned()]),
        args: Some(args),
        env: Some(env),
        resources: Some(requests(constants::SIDECAR_CPU_REQUEST, constants::SIDECAR_MEMORY_REQUEST)),
        volume_mounts: Some(vec![
            volume_mount(constants::VOLUME_ADMIN_KUBECONFIG, constants::KUBECONFIG_DIR),
            volume_mount(constants::VOLUME_KONNECTIVITY_PROXY_CERT, constants::KONNECTIVITY_PROXY_CLIENT_DIR),
            volume_mount(constants::VOLUME_KONNECTIVITY_PROXY_CA, constants::KONNECTIVITY_PROXY_CA_DIR),
            VolumeMount {
                name: constants::VOLUME_MANAGED_TRUST_BUNDLE.to_owned(),
                mount_path: format!("{}/{}", constants::CERTS_TRUST_PATH, constants::MANAGED_TRUST_BUNDLE_FILE),
                sub_path: Some(constants::MANAGED_TRUST_BUNDLE_FILE.to_owned()),
                ..VolumeMount::default()
            },
        ]),
        ..Container::default()
    }
}

fn secret_volume(name: &str, secret_name: &str) -> Volume {
    Volume {
        name: name.to_owned(),
        secret: Some(SecretVolumeSource {
            secret_name: Some(secret_name.to_owned()),
            default_mode: Some(constants::VOLUME_DEFAULT_MODE),
            ..SecretVolumeSource::default()
        }),
        ..Volume::default()
    }
}

/// Builds the volumes mounted by the operator and the konnectivity proxy
fn build_volumes() -> Vec<Volume> {
    vec![
        secret_volume(constants::VOLUME_INGRESS_OPERATOR_KUBECONFIG, constants::SECRET_INGRESS_OPERATOR_KUBECONFIG),
        secret_volume(constants::VOLUME_ADMIN_KUBECONFIG, constants::SECRET_SERVICE_NETWORK_ADMIN_KUBECONFIG),
        secret_volume(constants::VOLUME_KONNECTIVITY_PROXY_CERT, constants::SECRET_KONNECTIVITY_CLIENT),
        Volume {
            name: constants::VOLUME_KONNECTIVITY_PROXY_CA.to_owned(),
            config_map: Some(ConfigMapVolumeSource {
                name: Some(constants::CONFIG_MAP_KONNECTIVITY_CA.to_owned()),
                default_mode: Some(constants::VOLUME_DEFAULT_MODE),
                ..ConfigMapVolumeSource::default()
            }),
            ..Volume::default()
        },
        // Best effort: the pod must start even when the bundle was never published
        Volume {
            name: constants::VOLUME_MANAGED_TRUST_BUNDLE.to_owned(),
            config_map: Some(ConfigMapVolumeSource {
                name: Some(constants::CONFIG_MAP_TRUSTED_CA_BUNDLE.to_owned()),
                default_mode: Some(constants::VOLUME_DEFAULT_MODE),
                items: Some(vec![KeyToPath {
                    key: constants::USER_CA_BUNDLE_KEY.to_owned(),
                    path: constants::MANAGED_TRUST_BUNDLE_FILE.to_owned(),
                    ..KeyToPath::default()
                }]),
                optional: Some(true),
                ..ConfigMapVolumeSource::default()
            }),
            ..Volume::default()
        },
    ]
}

fn add_token_minter(pod_spec: &mut PodSpec, token_minter_image: &str) {
    pod_spec.containers[0]
        .volume_mounts
        .get_or_insert_with(Vec::new)
        .push(volume_mount(constants::VOLUME_SERVICE_ACCOUNT_TOKEN, constants::SERVICE_ACCOUNT_TOKEN_DIR));

    pod_spec.containers.push(Container {
        name: constants::TOKEN_MINTER_CONTAINER_NAME.to_owned(),
        image: Some(token_minter_image.to_owned()),
        command: Some(vec![constants::CONTROL_PLANE_OPERATOR_BINARY.to_owned(), "token-minter".to_owned()]),
        args: Some(vec![
            format!("--service-account-namespace={}", constants::INGRESS_OPERATOR_NAMESPACE),
            format!("--service-account-name={}", constants::INGRESS_OPERATOR_SERVICE_ACCOUNT),
            format!("--token-file={}", constants::SERVICE_ACCOUNT_TOKEN_FILE),
            format!("--kubeconfig={}", constants::KUBECONFIG_PATH),
        ]),
        resources: Some(requests(constants::SIDECAR_CPU_REQUEST, constants::SIDECAR_MEMORY_REQUEST)),
        volume_mounts: Some(vec![
            volume_mount(constants::VOLUME_SERVICE_ACCOUNT_TOKEN, constants::SERVICE_ACCOUNT_TOKEN_DIR),
            volume_mount(constants::VOLUME_ADMIN_KUBECONFIG, constants::KUBECONFIG_DIR),
        ]),
        ports: Some(vec![ContainerPort {
            container_port: constants::INGRESS_OPERATOR_METRICS_PORT,
            name: Some(constants::METRICS_PORT_NAME.to_owned()),
            ..ContainerPort::default()
        }]),
        ..Container::default()
    });

    pod_spec.volumes.get_or_insert_with(Vec::new).push(Volume {
        name: constants::VOLUME_SERVICE_ACCOUNT_TOKEN.to_owned(),
        empty_dir: Some(EmptyDirVolumeSource::default()),
        ..Volume::default()
    });
}

fn add_managed_identity(pod_spec: &mut PodSpec, credentials_file: &str) {
    let operator = &mut pod_spec.containers[0];
    operator.env.get_or_insert_with(Vec::new).extend(azure::managed_identity_env_vars(credentials_file));
    operator
        .volume_mounts
        .get_or_insert_with(Vec::new)
        .push(azure::secret_store_volume_mount(constants::VOLUME_MANAGED_AZURE_INGRESS_SECRET_STORE));

    pod_spec.volumes.get_or_insert_with(Vec::new).push(azure::secret_store_volume(
        constants::VOLUME_MANAGED_AZURE_INGRESS_SECRET_STORE,
        constants::MANAGED_AZURE_INGRESS_SECRET_PROVIDER_CLASS,
    ));
}
