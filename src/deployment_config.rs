use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    Affinity, NodeAffinity, NodeSelectorRequirement, NodeSelectorTerm, PodAffinity, PodAffinityTerm, PodSecurityContext, PreferredSchedulingTerm, Toleration,
    WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;
use kube::ResourceExt;
use std::collections::BTreeMap;

use crate::{constants, hosted_control_plane::HostedControlPlane};

/// Scheduling policy shared by every control plane component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scheduling {
    pub priority_class: String,
    pub affinity: Option<Affinity>,
    pub tolerations: Vec<Toleration>,
    pub node_selector: Option<BTreeMap<String, String>>,
}

/// Operator-wide overlay applied to a rendered deployment after its topology is assembled.
/// Anything set here wins over what the component reconciler produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentConfig {
    pub replicas: i32,
    pub scheduling: Scheduling,
    pub additional_labels: BTreeMap<String, String>,
    pub additional_annotations: BTreeMap<String, String>,
    pub set_default_security_context: bool,
}

impl DeploymentConfig {
    /// Carries the restart request of the hosted control plane into the pod template so that
    /// bumping the annotation on the control plane rolls the workload.
    pub fn set_restart_annotation(&mut self, hcp_metadata: &ObjectMeta) {
        if let Some(restart_date) = hcp_metadata.annotations.as_ref().and_then(|annotations| annotations.get(constants::ANNOTATION_RESTART_DATE)) {
            self.additional_annotations.insert(constants::ANNOTATION_RESTART_DATE.to_owned(), restart_date.to_owned());
        }
    }

    /// Baseline scheduling for a component of `hcp`: colocation with the rest of the control
    /// plane, isolation onto dedicated nodes, and the control plane's own node selector and
    /// tolerations.
    pub fn set_defaults(&mut self, hcp: &HostedControlPlane, replicas: Option<i32>) {
        self.replicas = replicas.unwrap_or(1);
        let namespace = hcp.namespace().unwrap_or_default();
        self.set_colocation(&namespace);
        self.set_control_plane_isolation(&namespace);
        self.scheduling.node_selector = hcp.spec.node_selector.clone();
        if let Some(tolerations) = &hcp.spec.tolerations {
            self.scheduling.tolerations.extend(tolerations.iter().cloned());
        }
    }

    fn set_colocation(&mut self, namespace: &str) {
        self.additional_labels.insert(constants::LABEL_HOSTED_CONTROL_PLANE.to_owned(), namespace.to_owned());
        let affinity = self.scheduling.affinity.get_or_insert_with(Affinity::default);
        affinity.pod_affinity = Some(PodAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![WeightedPodAffinityTerm {
                weight: constants::COLOCATION_AFFINITY_WEIGHT,
                pod_affinity_term: PodAffinityTerm {
                    label_selector: Some(LabelSelector {
                        match_labels: Some(BTreeMap::from([(constants::LABEL_HOSTED_CONTROL_PLANE.to_owned(), namespace.to_owned())])),
                        ..LabelSelector::default()
                    }),
                    topology_key: constants::TOPOLOGY_KEY_HOSTNAME.to_owned(),
                    ..PodAffinityTerm::default()
                },
            }]),
            ..PodAffinity::default()
        });
    }

    fn set_control_plane_isolation(&mut self, namespace: &str) {
        self.scheduling.tolerations.push(no_schedule_toleration(constants::LABEL_CONTROL_PLANE_NODE, "true"));
        self.scheduling.tolerations.push(no_schedule_toleration(constants::LABEL_CLUSTER_NODE, namespace));

        let affinity = self.scheduling.affinity.get_or_insert_with(Affinity::default);
        affinity.node_affinity = Some(NodeAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![
                preferred_node_term(constants::CONTROL_PLANE_NODE_AFFINITY_WEIGHT, constants::LABEL_CONTROL_PLANE_NODE, "true"),
                preferred_node_term(constants::CLUSTER_NODE_AFFINITY_WEIGHT, constants::LABEL_CLUSTER_NODE, namespace),
            ]),
            ..NodeAffinity::default()
        });
    }

    /// Applies the overlay onto `deployment`
    pub fn apply_to(&self, deployment: &mut Deployment) {
        let spec = deployment.spec.get_or_insert_with(Default::default);
        spec.replicas = Some(self.replicas);

        let metadata = spec.template.metadata.get_or_insert_with(ObjectMeta::default);
        if !self.additional_labels.is_empty() {
            metadata.labels.get_or_insert_with(BTreeMap::new).extend(self.additional_labels.clone());
        }
        if !self.additional_annotations.is_empty() {
            metadata.annotations.get_or_insert_with(BTreeMap::new).extend(self.additional_annotations.clone());
        }

        let pod_spec = spec.template.spec.get_or_insert_with(Default::default);
        if !self.scheduling.priority_class.is_empty() {
            pod_spec.priority_class_name = Some(self.scheduling.priority_class.to_owned());
        }
        if self.scheduling.affinity.is_some() {
            pod_spec.affinity = self.scheduling.affinity.clone();
        }
        if !self.scheduling.tolerations.is_empty() {
            pod_spec.tolerations = Some(self.scheduling.tolerations.clone());
        }
        if self.scheduling.node_selector.is_some() {
            pod_spec.node_selector = self.scheduling.node_selector.clone();
        }
        if self.set_default_security_context {
            pod_spec.security_context = Some(PodSecurityContext {
                run_as_user: Some(constants::DEFAULT_SECURITY_CONTEXT_USER),
                ..PodSecurityContext::default()
            });
        }
    }
}

fn no_schedule_toleration(key: &str, value: &str) -> Toleration {
    Toleration {
        key: Some(key.to_owned()),
        operator: Some("Equal".to_owned()),
        value: Some(value.to_owned()),
        effect: Some("NoSchedule".to_owned()),
        ..Toleration::default()
    }
}

fn preferred_node_term(weight: i32, key: &str, value: &str) -> PreferredSchedulingTerm {
    PreferredSchedulingTerm {
        weight,
        preference: NodeSelectorTerm {
            match_expressions: Some(vec![NodeSelectorRequirement {
                key: key.to_owned(),
                operator: "In".to_owned(),
                values: Some(vec![value.to_owned()]),
            }]),
            ..NodeSelectorTerm::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosted_control_plane::HostedControlPlaneSpec;
    use k8s_openapi::api::apps::v1::DeploymentSpec;
    use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};

    fn hcp() -> HostedControlPlane {
        let mut hcp = HostedControlPlane::new("hcp", HostedControlPlaneSpec::default());
        hcp.metadata.namespace = Some("clusters-demo".to_owned());
        hcp.metadata.annotations = Some(BTreeMap::from([(constants::ANNOTATION_RESTART_DATE.to_owned(), "2026-10-19T00:00:00Z".to_owned())]));
        hcp
    }

    #[test]
    fn test_set_restart_annotation() {
        let mut config = DeploymentConfig::default();
        config.set_restart_annotation(&hcp().metadata);
        assert_eq!(
            config.additional_annotations.get(constants::ANNOTATION_RESTART_DATE).map(String::as_str),
            Some("2026-10-19T00:00:00Z")
        );
    }

    #[test]
    fn test_set_defaults_isolates_onto_cluster_nodes() {
        let mut config = DeploymentConfig::default();
        config.set_defaults(&hcp(), Some(1));
        assert_eq!(config.replicas, 1);
        assert_eq!(config.scheduling.tolerations.len(), 2);
        assert_eq!(config.scheduling.tolerations[1].value.as_deref(), Some("clusters-demo"));
        assert_eq!(
            config.additional_labels.get(constants::LABEL_HOSTED_CONTROL_PLANE).map(String::as_str),
            Some("clusters-demo")
        );
        let affinity = config.scheduling.affinity.unwrap();
        assert!(affinity.pod_affinity.is_some());
        assert_eq!(affinity.node_affinity.unwrap().preferred_during_scheduling_ignored_during_execution.unwrap().len(), 2);
    }

    #[test]
    fn test_apply_to_overrides_scheduling_and_merges_metadata() {
        let mut config = DeploymentConfig {
            set_default_security_context: true,
            ..DeploymentConfig::default()
        };
        config.scheduling.priority_class = "custom".to_owned();
        config.set_defaults(&hcp(), Some(1));
        config.set_restart_annotation(&hcp().metadata);

        let mut deployment = Deployment {
            spec: Some(DeploymentSpec {
                replicas: Some(3),
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(BTreeMap::from([("name".to_owned(), "x".to_owned())])),
                        ..ObjectMeta::default()
                    }),
                    spec: Some(PodSpec {
                        priority_class_name: Some("low".to_owned()),
                        ..PodSpec::default()
                    }),
                },
                ..DeploymentSpec::default()
            }),
            ..Deployment::default()
        };
        config.apply_to(&mut deployment);

        let spec = deployment.spec.unwrap();
        assert_eq!(spec.replicas, Some(1));
        let labels = spec.template.metadata.as_ref().unwrap().labels.as_ref().unwrap();
        assert_eq!(labels.get("name").map(String::as_str), Some("x"));
        assert!(labels.contains_key(constants::LABEL_HOSTED_CONTROL_PLANE));
        let pod_spec = spec.template.spec.unwrap();
        assert_eq!(pod_spec.priority_class_name.as_deref(), Some("custom"));
        assert_eq!(pod_spec.security_context.unwrap().run_as_user, Some(1001));
        assert_eq!(pod_spec.tolerations.unwrap().len(), 2);
    }
}
