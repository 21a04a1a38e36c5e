use std::sync::Arc;

use ingress_operator_reconciler::{context_data::ContextData, model::Error, operator};
use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let version: &str = env!("CARGO_PKG_VERSION");
    info!("Starting ingress-operator-reconciler {}", version);
    let client: Client = Client::try_default().await?;
    let context_data: Arc<ContextData> = Arc::new(ContextData::new(client)?);

    operator::run(context_data).await;
    info!("Ingress operator controller stopped");
    Ok(())
}
