pub mod availability_prober;
pub mod azure;
pub mod constants;
pub mod context_data;
pub mod deployment_config;
pub mod hosted_control_plane;
pub mod image_provider;
pub mod ingress_operator;
pub mod metrics;
pub mod model;
pub mod operator;
pub mod operator_config;
pub mod pod_monitor;
pub mod proxy;
pub mod resource_generics;
pub mod utils;
