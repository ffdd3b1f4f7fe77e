//! Index server

use crate::common::{IndexConfig, Result};
use crate::coordinator::flow::Coordinator;
use crate::coordinator::http::{create_router, CoordState};
use crate::coordinator::index::RocksIndex;
use crate::coordinator::placement::VolumeSet;
use crate::coordinator::volume_client::VolumeClient;
use std::sync::Arc;

pub struct IndexServer {
    config: IndexConfig,
}

impl IndexServer {
    pub fn new(config: IndexConfig) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        self.config.validate()?;

        tracing::info!("Starting index server");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  DB path: {}", self.config.db_path.display());
        tracing::info!("  Volumes: {}", self.config.volumes.join(","));

        let index = Arc::new(RocksIndex::open(&self.config.db_path)?);
        let volumes = VolumeSet::new(self.config.volumes.clone())?;
        let client = VolumeClient::new(self.config.volume_timeout())?;

        let state = CoordState {
            coordinator: Arc::new(Coordinator::new(index.clone(), volumes, client)),
        };
        let router = create_router(state);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Index server ready");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        index.flush()?;
        tracing::info!("Index server stopped");
        Ok(())
    }
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
