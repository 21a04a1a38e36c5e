/// All errors possible to occur while syncing the ingress operator workload
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    KubeError {
        #[from]
        source: kube::Error,
    },

    #[error("YAML Parsing error: {0}")]
    ParserError(
        #[from]
        serde_yaml::Error,
    ),

    /// The operator configuration file could not be read
    #[error("Could not read operator configuration {path}: {source}")]
    ConfigReadError {
        path: String,
        source: std::io::Error,
    },

    /// The operator configuration is invalid
    #[error("Invalid operator configuration: {0}")]
    OperatorConfigError(String),
}
