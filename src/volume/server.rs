//! Reference volume server

use crate::common::{Result, VolumeConfig};
use crate::coordinator::server::shutdown_signal;
use crate::volume::http::{create_router, VolumeState};
use std::sync::Arc;

pub struct VolumeServer {
    config: VolumeConfig,
}

impl VolumeServer {
    pub fn new(config: VolumeConfig) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting volume server");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  Data path: {}", self.config.data_path.display());

        tokio::fs::create_dir_all(&self.config.data_path).await?;

        let router = create_router(VolumeState {
            root: Arc::new(self.config.data_path.clone()),
        });

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Volume server ready");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
