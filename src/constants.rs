// Operator Constants
pub const RECONCILE_FREQUENCY: u64 = 10;
pub const OPERATOR_ENVIRONMENT: &str = "OPERATOR_ENVIRONMENT";
pub const FIELD_MANAGER: &str = "ingress-operator-reconciler";

// Workload naming
pub const OPERATOR_NAME: &str = "ingress-operator";
pub const INGRESS_OPERATOR_CONTAINER_NAME: &str = "ingress-operator";
pub const KONNECTIVITY_PROXY_CONTAINER_NAME: &str = "konnectivity-proxy";
pub const TOKEN_MINTER_CONTAINER_NAME: &str = "token-minter";
pub const AVAILABILITY_PROBER_CONTAINER_NAME: &str = "availability-prober";
pub const INGRESS_OPERATOR_NAMESPACE: &str = "openshift-ingress-operator";
pub const INGRESS_OPERATOR_SERVICE_ACCOUNT: &str = "ingress-operator";
pub const KUBE_APISERVER_SERVICE_NAME: &str = "kube-apiserver";

// Annotations
pub const ANNOTATION_CONTROL_PLANE_PRIORITY_CLASS: &str = "hypershift.openshift.io/control-plane-priority-class";
pub const ANNOTATION_RESTART_DATE: &str = "hypershift.openshift.io/restart-date";
pub const ANNOTATION_WORKLOAD_MANAGEMENT: &str = "target.workload.openshift.io/management";
pub const WORKLOAD_MANAGEMENT_PREFERRED: &str = r#"{"effect": "PreferredDuringScheduling"}"#;

// Labels
pub const LABEL_NAME: &str = "name";
pub const LABEL_APP: &str = "app";
pub const LABEL_CONTROL_PLANE_COMPONENT: &str = "hypershift.openshift.io/control-plane-component";
pub const LABEL_HOSTED_CONTROL_PLANE: &str = "hypershift.openshift.io/hosted-control-plane";
pub const LABEL_CONTROL_PLANE_NODE: &str = "hypershift.openshift.io/control-plane";
pub const LABEL_CLUSTER_NODE: &str = "hypershift.openshift.io/cluster";

// Scheduling
pub const DEFAULT_PRIORITY_CLASS: &str = "hypershift-control-plane";
pub const DEFAULT_SECURITY_CONTEXT_USER: i64 = 1001;
pub const TOPOLOGY_KEY_HOSTNAME: &str = "kubernetes.io/hostname";
pub const COLOCATION_AFFINITY_WEIGHT: i32 = 100;
pub const CONTROL_PLANE_NODE_AFFINITY_WEIGHT: i32 = 50;
pub const CLUSTER_NODE_AFFINITY_WEIGHT: i32 = 100;

// Ports
pub const INGRESS_OPERATOR_METRICS_PORT: i32 = 60000;
pub const KONNECTIVITY_PROXY_PORT: i32 = 8090;
pub const KUBE_APISERVER_PORT: i32 = 6443;
pub const KUBE_APISERVER_PORT_IBMCLOUD: i32 = 2040;
pub const METRICS_PORT_NAME: &str = "metrics";

// Resources
pub const INGRESS_OPERATOR_CPU_REQUEST: &str = "10m";
pub const INGRESS_OPERATOR_MEMORY_REQUEST: &str = "80Mi";
pub const SIDECAR_CPU_REQUEST: &str = "10m";
pub const SIDECAR_MEMORY_REQUEST: &str = "30Mi";

// Volumes
pub const VOLUME_DEFAULT_MODE: i32 = 0o640;
pub const VOLUME_INGRESS_OPERATOR_KUBECONFIG: &str = "ingress-operator-kubeconfig";
pub const VOLUME_ADMIN_KUBECONFIG: &str = "admin-kubeconfig";
pub const VOLUME_KONNECTIVITY_PROXY_CERT: &str = "konnectivity-proxy-cert";
pub const VOLUME_KONNECTIVITY_PROXY_CA: &str = "konnectivity-proxy-ca";
pub const VOLUME_MANAGED_TRUST_BUNDLE: &str = "managed-trust-bundle";
pub const VOLUME_SERVICE_ACCOUNT_TOKEN: &str = "serviceaccount-token";
pub const VOLUME_MANAGED_AZURE_INGRESS_SECRET_STORE: &str = "ingress-cert";

// Secrets and config maps referenced by volumes
pub const SECRET_INGRESS_OPERATOR_KUBECONFIG: &str = "ingress-operator-kubeconfig";
pub const SECRET_SERVICE_NETWORK_ADMIN_KUBECONFIG: &str = "service-network-admin-kubeconfig";
pub const SECRET_KONNECTIVITY_CLIENT: &str = "konnectivity-client";
pub const CONFIG_MAP_KONNECTIVITY_CA: &str = "konnectivity-ca-bundle";
pub const CONFIG_MAP_TRUSTED_CA_BUNDLE: &str = "trusted-ca-bundle-managed";
pub const USER_CA_BUNDLE_KEY: &str = "ca-bundle.crt";
pub const MANAGED_AZURE_INGRESS_SECRET_PROVIDER_CLASS: &str = "managed-azure-ingress";

// Paths
pub const KUBECONFIG_DIR: &str = "/etc/kubernetes";
pub const KUBECONFIG_PATH: &str = "/etc/kubernetes/kubeconfig";
pub const KONNECTIVITY_PROXY_CLIENT_DIR: &str = "/etc/konnectivity/proxy-client";
pub const KONNECTIVITY_PROXY_CA_DIR: &str = "/etc/konnectivity/proxy-ca";
pub const CERTS_TRUST_PATH: &str = "/etc/pki/tls/certs";
pub const MANAGED_TRUST_BUNDLE_FILE: &str = "managed-trust-bundle.crt";
pub const SERVICE_ACCOUNT_TOKEN_DIR: &str = "/var/run/secrets/openshift/serviceaccount";
pub const SERVICE_ACCOUNT_TOKEN_FILE: &str = "/var/run/secrets/openshift/serviceaccount/token";
pub const MANAGED_AZURE_CERTIFICATE_PATH: &str = "/mnt/certs";
pub const CONTROL_PLANE_OPERATOR_BINARY: &str = "/usr/bin/control-plane-operator";
pub const PROBER_KUBECONFIG_DIR: &str = "/var/kubeconfig";
pub const PROBER_KUBECONFIG_PATH: &str = "/var/kubeconfig/kubeconfig";

// Release image catalog keys
pub const IMAGE_CLUSTER_INGRESS_OPERATOR: &str = "cluster-ingress-operator";
pub const IMAGE_HAPROXY_ROUTER: &str = "haproxy-router";
pub const IMAGE_TOKEN_MINTER: &str = "token-minter";
pub const IMAGE_CONTROL_PLANE_OPERATOR: &str = "control-plane-operator";
pub const IMAGE_AVAILABILITY_PROBER: &str = "availability-prober";

// Environment variables
pub const ENV_RELEASE_VERSION: &str = "RELEASE_VERSION";
pub const ENV_IMAGE: &str = "IMAGE";
pub const ENV_CANARY_IMAGE: &str = "CANARY_IMAGE";
pub const ENV_KUBECONFIG: &str = "KUBECONFIG";
pub const ENV_HTTP_PROXY: &str = "HTTP_PROXY";
pub const ENV_HTTPS_PROXY: &str = "HTTPS_PROXY";
pub const ENV_NO_PROXY: &str = "NO_PROXY";
pub const ENV_MANAGED_AZURE_CREDENTIALS_FILE_PATH: &str = "MANAGED_AZURE_HCP_CREDENTIALS_FILE_PATH";

// Required APIs
pub const ROUTE_API_GROUP: &str = "route.openshift.io";
pub const ROUTE_API_VERSION: &str = "v1";
pub const ROUTE_API_KIND: &str = "Route";

// Monitoring
pub const SCRAPE_INTERVAL: &str = "60s";
pub const METRICS_PATH: &str = "/metrics";
pub const METRICS_SCHEME: &str = "http";
pub const CLUSTER_ID_LABEL: &str = "_id";
pub const INGRESS_OPERATOR_TELEMETRY_METRICS: &str =
    "ingress_controller_conditions|ingress_controller_aws_nlb_active|ingress_canary_check_success|ingress_canary_route_reachable";

// Networking
pub const CLOUD_METADATA_ADDRESS: &str = "169.254.169.254";
