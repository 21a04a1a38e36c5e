pub mod ingress_operator_deployment;
pub mod ingress_operator_params;
pub mod ingress_operator_pod_monitor;

pub use ingress_operator_deployment::{reconcile_deployment, PlatformExtension};
pub use ingress_operator_params::IngressOperatorParams;
pub use ingress_operator_pod_monitor::reconcile_pod_monitor;
