pub(crate) mod error;
mod handlers;
mod router;

use anyhow::Result;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::store::Store;

/// Shared state cloned into every handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Store,
    pub(crate) http: reqwest::Client,
    pub(crate) config: ServerConfig,
}

pub struct ApiServer {
    store: Store,
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(store: Store, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub async fn serve(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.config.port);
        let state = AppState {
            store: self.store,
            http: reqwest::Client::new(),
            config: self.config,
        };
        let app = router::build_api_router(state);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("opsdeck API listening on http://{addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}
