use tracing::debug;

use crate::{
    constants,
    metrics::{self, MetricsPolicy},
    pod_monitor::{PodMonitor, PodMonitorNamespaceSelector, PodMonitorPodMetricsEndpoints},
    utils,
};

/// Renders the scrape configuration of the ingress operator pods into `pod_monitor`.
/// Nothing from the previous revision is kept.
///
/// # Arguments
/// - `pod_monitor` - PodMonitor to render into. Its namespace scopes the scrape; without one the
///   namespace selector is left unset.
/// - `cluster_id` - Identifier of the hosted cluster, stamped on every scraped target
/// - `metrics_policy` - Metrics set deciding which series are kept
///
pub fn reconcile_pod_monitor(pod_monitor: &mut PodMonitor, cluster_id: &str, metrics_policy: &MetricsPolicy) {
    pod_monitor.spec.selector.match_labels = Some(utils::selector_labels(constants::OPERATOR_NAME));
    pod_monitor.spec.namespace_selector = pod_monitor
        .metadata
        .namespace
        .as_ref()
        .filter(|namespace| !namespace.is_empty())
        .map(|namespace| PodMonitorNamespaceSelector {
            match_names: Some(vec![namespace.to_owned()]),
            ..PodMonitorNamespaceSelector::default()
        });

    let mut endpoint = PodMonitorPodMetricsEndpoints {
        interval: Some(constants::SCRAPE_INTERVAL.to_owned()),
        port: Some(constants::METRICS_PORT_NAME.to_owned()),
        path: Some(constants::METRICS_PATH.to_owned()),
        scheme: Some(constants::METRICS_SCHEME.to_owned()),
        metric_relabelings: metrics_policy.ingress_operator_relabel_configs(),
        ..PodMonitorPodMetricsEndpoints::default()
    };
    metrics::apply_cluster_id_label(&mut endpoint, cluster_id);
    pod_monitor.spec.pod_metrics_endpoints = Some(vec![endpoint]);

    debug!("Reconciled pod monitor for cluster {cluster_id} with metrics set {}", metrics_policy.metrics_set);
}
