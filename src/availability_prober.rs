use k8s_openapi::api::core::v1::{Container, PodSpec, VolumeMount};
use kube::core::GroupVersionKind;

use crate::constants;

/// Knobs of the availability prober init container
#[derive(Debug, Clone, Default)]
pub struct AvailabilityProberOpts {
    /// Volume holding a kubeconfig for the hosted cluster. Required APIs are only checked when set.
    pub kubeconfig_volume_name: Option<String>,
    pub required_apis: Vec<GroupVersionKind>,
}

/// Gates pod startup on `target` answering and on the required APIs being served.
///
/// The prober is kept as the first init container: an existing one is replaced in place,
/// otherwise it is prepended.
///
/// # Arguments
/// - `target` - URL the prober polls until it answers
/// - `image` - Image carrying the control plane operator binary
/// - `pod_spec` - Pod spec receiving the init container
/// - `configure` - Callback to set the kubeconfig volume and required APIs
///
pub fn inject<F>(target: &str, image: &str, pod_spec: &mut PodSpec, configure: F)
where
    F: FnOnce(&mut AvailabilityProberOpts),
{
    let mut opts = AvailabilityProberOpts::default();
    configure(&mut opts);

    let mut command = vec![
        constants::CONTROL_PLANE_OPERATOR_BINARY.to_owned(),
        "availability-prober".to_owned(),
        "--target".to_owned(),
        target.to_owned(),
    ];
    let mut volume_mounts = Vec::new();
    if let Some(volume_name) = &opts.kubeconfig_volume_name {
        volume_mounts.push(VolumeMount {
            name: volume_name.to_owned(),
            mount_path: constants::PROBER_KUBECONFIG_DIR.to_owned(),
            ..VolumeMount::default()
        });
        command.push(format!("--kubeconfig={}", constants::PROBER_KUBECONFIG_PATH));
        for api in &opts.required_apis {
            command.push(format!("--required-api={},{},{}", api.group, api.version, api.kind));
        }
    }

    let prober = Container {
        name: constants::AVAILABILITY_PROBER_CONTAINER_NAME.to_owned(),
        image: Some(image.to_owned()),
        image_pull_policy: Some("IfNotPresent".to_owned()),
        command: Some(command),
        volume_mounts: if volume_mounts.is_empty() { None } else { Some(volume_mounts) },
        ..Container::default()
    };

    let init_containers = pod_spec.init_containers.get_or_insert_with(Vec::new);
    let has_prober = init_containers
        .first()
        .map_or(false, |first| first.name == constants::AVAILABILITY_PROBER_CONTAINER_NAME);
    if has_prober {
        init_containers[0] = prober;
    } else {
        init_containers.insert(0, prober);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_without_kubeconfig_only_checks_target() {
        let mut pod_spec = PodSpec::default();
        inject("https://kas:6443/readyz", "prober:1", &mut pod_spec, |_| {});
        let init_containers = pod_spec.init_containers.unwrap();
        assert_eq!(init_containers.len(), 1);
        assert_eq!(
            init_containers[0].command.as_ref().unwrap(),
            &vec![
                "/usr/bin/control-plane-operator".to_owned(),
                "availability-prober".to_owned(),
                "--target".to_owned(),
                "https://kas:6443/readyz".to_owned(),
            ]
        );
        assert!(init_containers[0].volume_mounts.is_none());
    }

    #[test]
    fn test_inject_required_apis() {
        let mut pod_spec = PodSpec::default();
        inject("https://kas:6443/readyz", "prober:1", &mut pod_spec, |opts| {
            opts.kubeconfig_volume_name = Some("kubeconfig".to_owned());
            opts.required_apis = vec![GroupVersionKind::gvk("route.openshift.io", "v1", "Route")];
        });
        let prober = &pod_spec.init_containers.unwrap()[0];
        let command = prober.command.as_ref().unwrap();
        assert!(command.contains(&"--kubeconfig=/var/kubeconfig/kubeconfig".to_owned()));
        assert!(command.contains(&"--required-api=route.openshift.io,v1,Route".to_owned()));
        assert_eq!(prober.volume_mounts.as_ref().unwrap()[0].name, "kubeconfig");
    }

    #[test]
    fn test_inject_replaces_existing_prober_and_keeps_other_init_containers() {
        let mut pod_spec = PodSpec {
            init_containers: Some(vec![Container {
                name: "setup".to_owned(),
                ..Container::default()
            }]),
            ..PodSpec::default()
        };
        inject("https://kas:6443/readyz", "prober:1", &mut pod_spec, |_| {});
        inject("https://kas:6443/readyz", "prober:2", &mut pod_spec, |_| {});
        let init_containers = pod_spec.init_containers.unwrap();
        assert_eq!(init_containers.len(), 2);
        assert_eq!(init_containers[0].image.as_deref(), Some("prober:2"));
        assert_eq!(init_containers[1].name, "setup");
    }
}
