use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{
    constants,
    pod_monitor::{PodMonitorPodMetricsEndpoints, RelabelConfig, RelabelConfigAction},
};

/// Verbosity tier of the metrics scraped from control plane components
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, JsonSchema, Hash, Default)]
pub enum MetricsSet {
    /// Every metric the component exposes
    #[default]
    All,
    /// Only what is forwarded to telemetry
    Telemetry,
    /// Metrics selected by SRE through configuration
    #[serde(rename = "SRE")]
    Sre,
}

impl Display for MetricsSet {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            MetricsSet::All => write!(f, "All"),
            MetricsSet::Telemetry => write!(f, "Telemetry"),
            MetricsSet::Sre => write!(f, "SRE"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema, Default)]
pub struct MetricsPolicy {
    #[serde(default)]
    pub metrics_set: MetricsSet,
    /// Relabel rules used for the ingress operator when the SRE set is selected
    #[serde(default)]
    pub sre_relabel_configs: Vec<RelabelConfig>,
}

impl MetricsPolicy {
    pub fn ingress_operator_relabel_configs(&self) -> Option<Vec<RelabelConfig>> {
        match self.metrics_set {
            MetricsSet::All => None,
            MetricsSet::Telemetry => Some(vec![RelabelConfig {
                action: Some(RelabelConfigAction::Keep),
                regex: Some(constants::INGRESS_OPERATOR_TELEMETRY_METRICS.to_owned()),
                source_labels: Some(vec!["__name__".to_owned()]),
                ..RelabelConfig::default()
            }]),
            MetricsSet::Sre if self.sre_relabel_configs.is_empty() => None,
            MetricsSet::Sre => Some(self.sre_relabel_configs.clone()),
        }
    }
}

/// Stamps the hosted cluster id onto every target scraped through `endpoint`
pub fn apply_cluster_id_label(endpoint: &mut PodMonitorPodMetricsEndpoints, cluster_id: &str) {
    endpoint.relabelings.get_or_insert_with(Vec::new).push(RelabelConfig {
        action: Some(RelabelConfigAction::Replace),
        replacement: Some(cluster_id.to_owned()),
        target_label: Some(constants::CLUSTER_ID_LABEL.to_owned()),
        ..RelabelConfig::default()
    });
}
