use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    api::Api,
    runtime::{
        controller::{Action, Controller},
        watcher::Config,
    },
    Resource, ResourceExt,
};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info};

use crate::{
    constants,
    context_data::ContextData,
    hosted_control_plane::HostedControlPlane,
    image_provider::ReleaseImageCatalog,
    ingress_operator::{reconcile_deployment, reconcile_pod_monitor, IngressOperatorParams},
    model::Error,
    pod_monitor::PodMonitor,
    resource_generics,
};

/// Renders and applies the ingress operator workload of `hcp` once
///
/// # Arguments
/// - `hcp` - Hosted control plane the workload belongs to
/// - `context` - Client and operator configuration
///
pub async fn sync(hcp: &HostedControlPlane, context: &ContextData) -> Result<(), Error> {
    let config = &context.config;
    let namespace = hcp.namespace().unwrap_or_else(|| config.hosted_control_plane.namespace.to_owned());
    let owner_reference = hcp.controller_owner_ref(&());

    let release_images = ReleaseImageCatalog::new(config.release_images.clone());
    let user_release_images = ReleaseImageCatalog::new(config.user_release_images.clone());
    let platform = hcp.spec.platform.r#type;
    let params = IngressOperatorParams::new(
        hcp,
        &config.release_version,
        &release_images,
        &user_release_images,
        config.set_default_security_context,
        platform,
    )
    .with_management_proxy_env(context.management_proxy_env.clone());

    let mut deployment: Deployment = resource_generics::get_or_empty(context.client.clone(), constants::OPERATOR_NAME, &namespace).await?;
    reconcile_deployment(&mut deployment, &params, platform);
    if let Some(owner_reference) = &owner_reference {
        resource_generics::set_owner_reference(&mut deployment, owner_reference.clone());
    }
    resource_generics::apply(context.client.clone(), &deployment).await?;

    let mut pod_monitor: PodMonitor = resource_generics::get_or_empty(context.client.clone(), constants::OPERATOR_NAME, &namespace).await?;
    reconcile_pod_monitor(&mut pod_monitor, &hcp.spec.cluster_id, &config.metrics);
    if let Some(owner_reference) = owner_reference {
        resource_generics::set_owner_reference(&mut pod_monitor, owner_reference);
    }
    resource_generics::apply(context.client.clone(), &pod_monitor).await?;

    Ok(())
}

async fn reconciler(hcp: Arc<HostedControlPlane>, context: Arc<ContextData>) -> Result<Action, Error> {
    sync(&hcp, &context).await?;
    Ok(Action::requeue(Duration::from_secs(context.config.reconcile_frequency)))
}

/// Actions to be taken when a reconciliation fails.
/// Logs the error and requeues the hosted control plane after the reconcile frequency.
///
/// # Arguments
/// - `hcp`: The hosted control plane that failed to sync.
/// - `error`: A reference to the `Error` that occurred during reconciliation.
/// - `context`: Context Data "injected" automatically by kube-rs.
pub fn on_error(hcp: Arc<HostedControlPlane>, error: &Error, context: Arc<ContextData>) -> Action {
    error!("[IngressOperator] Reconciliation error for {}:\n{:?}", hcp.name_any(), error);
    Action::requeue(Duration::from_secs(context.config.reconcile_frequency))
}

/// Watches the configured hosted control plane and the workload it owns, syncing on every change
/// and at least every reconcile frequency. Returns once a shutdown signal is received.
pub async fn run(context: Arc<ContextData>) {
    let hcp_ref = &context.config.hosted_control_plane;
    let client = context.client.clone();
    let owned_api: Api<HostedControlPlane> = Api::namespaced(client.clone(), &hcp_ref.namespace);
    let deployment = Api::<Deployment>::namespaced(client.clone(), &hcp_ref.namespace);
    let pod_monitor = Api::<PodMonitor>::namespaced(client, &hcp_ref.namespace);
    let hcp_selector = Config::default().fields(&format!("metadata.name={}", hcp_ref.name));

    Controller::new(owned_api, hcp_selector)
        .owns(deployment, Config::default())
        .owns(pod_monitor, Config::default())
        .shutdown_on_signal()
        .run(reconciler, on_error, context)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok((hcp, _action)) => info!("[IngressOperator] Workload of {} in sync", hcp.name),
                Err(reconciliation_err) => {
                    let err_string = reconciliation_err.to_string();
                    if !err_string.contains("that was not found in local store") {
                        // https://github.com/kube-rs/kube/issues/712
                        error!("[IngressOperator] Reconciliation error: {:?}", reconciliation_err)
                    }
                }
            }
        })
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hosted_control_plane::HostedControlPlaneSpec,
        metrics::MetricsPolicy,
        operator_config::{HostedControlPlaneRef, OperatorConfig},
        proxy::ProxyEnv,
    };
    use kube::Client;
    use std::collections::BTreeMap;

    fn context(reconcile_frequency: u64) -> Arc<ContextData> {
        // Never connects: only the requeue policy is exercised
        let config = kube::Config::new("http://127.0.0.1:6443".parse().unwrap());
        Arc::new(ContextData {
            client: Client::try_from(config).unwrap(),
            config: OperatorConfig {
                hosted_control_plane: HostedControlPlaneRef {
                    name: "demo".to_owned(),
                    namespace: "clusters-demo".to_owned(),
                },
                release_version: "4.16.0".to_owned(),
                release_images: BTreeMap::new(),
                user_release_images: BTreeMap::new(),
                set_default_security_context: false,
                metrics: MetricsPolicy::default(),
                reconcile_frequency,
            },
            management_proxy_env: ProxyEnv::default(),
        })
    }

    #[tokio::test]
    async fn test_on_error_requeues_after_reconcile_frequency() {
        let hcp = Arc::new(HostedControlPlane::new("demo", HostedControlPlaneSpec::default()));
        let error = Error::OperatorConfigError("broken".to_owned());
        let action = on_error(hcp, &error, context(42));
        assert_eq!(action, Action::requeue(Duration::from_secs(42)));
    }
}
