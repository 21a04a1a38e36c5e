use k8s_openapi::api::core::v1::Toleration;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

/// Control plane of a hosted cluster, as seen by the components rendered into its namespace.
/// Only the fields the ingress operator workload depends on are modelled.
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[kube(
    group = "hypershift.openshift.io",
    version = "v1beta1",
    kind = "HostedControlPlane",
    plural = "hostedcontrolplanes",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HostedControlPlaneSpec {
    #[serde(rename = "clusterID", default)]
    pub cluster_id: String,
    pub platform: PlatformSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ClusterConfiguration>,
    #[serde(default)]
    pub networking: ClusterNetworking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerations: Option<Vec<Toleration>>,
}

/// Infrastructure platforms a hosted control plane can run workers on.
///
/// Deserialization rejects values outside this set, so an unknown platform never reaches
/// the reconciler.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, JsonSchema, Hash, Default)]
pub enum PlatformType {
    #[serde(rename = "AWS")]
    Aws,
    Azure,
    #[serde(rename = "IBMCloud")]
    IbmCloud,
    KubeVirt,
    Agent,
    OpenStack,
    #[serde(rename = "PowerVS")]
    PowerVs,
    #[default]
    None,
}

impl PlatformType {
    pub const ALL: [PlatformType; 8] = [
        PlatformType::Aws,
        PlatformType::Azure,
        PlatformType::IbmCloud,
        PlatformType::KubeVirt,
        PlatformType::Agent,
        PlatformType::OpenStack,
        PlatformType::PowerVs,
        PlatformType::None,
    ];
}

impl Display for PlatformType {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            PlatformType::Aws => write!(f, "AWS"),
            PlatformType::Azure => write!(f, "Azure"),
            PlatformType::IbmCloud => write!(f, "IBMCloud"),
            PlatformType::KubeVirt => write!(f, "KubeVirt"),
            PlatformType::Agent => write!(f, "Agent"),
            PlatformType::OpenStack => write!(f, "OpenStack"),
            PlatformType::PowerVs => write!(f, "PowerVS"),
            PlatformType::None => write!(f, "None"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSpec {
    pub r#type: PlatformType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzurePlatformSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AzurePlatformSpec {
    /// Present only when the control plane authenticates to Azure through managed identities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_identities: Option<AzureResourceManagedIdentities>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AzureResourceManagedIdentities {
    pub control_plane: ControlPlaneManagedIdentities,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ControlPlaneManagedIdentities {
    pub ingress: ManagedIdentity,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ManagedIdentity {
    /// Name of the file the secret store CSI driver projects the identity credentials into
    pub credentials_secret_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxySpec>,
}

/// Cluster-wide outbound proxy
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProxySpec {
    #[serde(default)]
    pub http_proxy: String,
    #[serde(default)]
    pub https_proxy: String,
    /// Comma-separated list of hosts, domains and CIDRs that bypass the proxy
    #[serde(default)]
    pub no_proxy: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworking {
    #[serde(default)]
    pub machine_network: Vec<NetworkEntry>,
    #[serde(default)]
    pub cluster_network: Vec<NetworkEntry>,
    #[serde(default)]
    pub service_network: Vec<NetworkEntry>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkEntry {
    pub cidr: String,
}
