use crate::{constants, hosted_control_plane::PlatformType};
use k8s_openapi::api::core::v1::{Container, EnvVar};
use std::collections::BTreeMap;

/// Labels every pod of the ingress operator carries and is selected by
pub fn common_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels: BTreeMap<String, String> = BTreeMap::new();
    labels.insert(constants::LABEL_NAME.to_owned(), name.to_owned());
    labels.insert(constants::LABEL_APP.to_owned(), name.to_owned());
    labels.insert(constants::LABEL_CONTROL_PLANE_COMPONENT.to_owned(), name.to_owned());
    labels
}

pub fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(constants::LABEL_NAME.to_owned(), name.to_owned())])
}

pub fn find_container<'a>(name: &str, containers: &'a [Container]) -> Option<&'a Container> {
    containers.iter().find(|container| container.name == name)
}

pub fn env_var(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_owned(),
        value: Some(value.to_owned()),
        ..EnvVar::default()
    }
}

/// Replaces the value of `name` in place, or appends it when absent
pub fn upsert_env_var(env_vars: &mut Vec<EnvVar>, name: &str, value: &str) {
    match env_vars.iter_mut().find(|env_var| env_var.name == name) {
        Some(existing) => {
            existing.value = Some(value.to_owned());
            existing.value_from = None;
        }
        None => env_vars.push(env_var(name, value)),
    }
}

/// Readiness endpoint of the hosted kube-apiserver as reachable from inside the control plane namespace
pub fn in_cluster_kas_ready_url(platform: PlatformType) -> String {
    let port = match platform {
        PlatformType::IbmCloud => constants::KUBE_APISERVER_PORT_IBMCLOUD,
        PlatformType::Aws
        | PlatformType::Azure
        | PlatformType::KubeVirt
        | PlatformType::Agent
        | PlatformType::OpenStack
        | PlatformType::PowerVs
        | PlatformType::None => constants::KUBE_APISERVER_PORT,
    };
    format!("https://{}:{}/readyz", constants::KUBE_APISERVER_SERVICE_NAME, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_cluster_kas_ready_url() {
        assert_eq!(in_cluster_kas_ready_url(PlatformType::Aws), "https://kube-apiserver:6443/readyz");
        assert_eq!(in_cluster_kas_ready_url(PlatformType::IbmCloud), "https://kube-apiserver:2040/readyz");
    }

    #[test]
    fn test_upsert_env_var_replaces_value_from() {
        let mut env_vars = vec![EnvVar {
            name: "A".to_owned(),
            value_from: Some(Default::default()),
            ..EnvVar::default()
        }];
        upsert_env_var(&mut env_vars, "A", "1");
        upsert_env_var(&mut env_vars, "B", "2");
        assert_eq!(env_vars, vec![env_var("A", "1"), env_var("B", "2")]);
    }
}
