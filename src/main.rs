mod config;
mod core;
mod interfaces;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::core::store::Store;
use crate::interfaces::web::ApiServer;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("opsdeck failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("opsdeck=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = Store::open(&config.data_dir).await?;
    info!("store ready at {}", config.data_dir.display());

    ApiServer::new(store, config).serve().await
}
