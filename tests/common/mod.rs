//! Helpers for spinning up index and volume servers on ephemeral ports

#![allow(dead_code)]

use axum::Router;
use mkv::common::Result;
use mkv::coordinator::http::{create_router, CoordState};
use mkv::coordinator::{Coordinator, IndexStore, MemoryIndex, VolumeClient, VolumeSet};
use mkv::volume::http::{create_router as volume_router, VolumeState};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serve `router` on 127.0.0.1 at a free port
pub async fn spawn_router(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Reference volume storing under `root`; returns its `host:port`
pub async fn spawn_volume(root: &Path) -> String {
    let router = volume_router(VolumeState {
        root: Arc::new(root.to_path_buf()),
    });
    spawn_router(router).await.to_string()
}

/// Index over `index` and `volumes`; returns its base URL
pub async fn spawn_index(index: Arc<dyn IndexStore>, volumes: Vec<String>) -> String {
    let coordinator = Coordinator::new(
        index,
        VolumeSet::new(volumes).unwrap(),
        VolumeClient::new(Duration::from_secs(5)).unwrap(),
    );
    let router = create_router(CoordState {
        coordinator: Arc::new(coordinator),
    });
    format!("http://{}", spawn_router(router).await)
}

/// Client that does not follow redirects, so 302s can be inspected
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Memory index whose operations can be made to fail on demand
#[derive(Default)]
pub struct FlakyIndex {
    pub inner: MemoryIndex,
    pub fail_get: AtomicBool,
    pub fail_has: AtomicBool,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
}

fn check(flag: &AtomicBool, op: &str) -> Result<()> {
    if flag.load(Ordering::SeqCst) {
        return Err(mkv::Error::Index(format!("injected {} failure", op)));
    }
    Ok(())
}

impl IndexStore for FlakyIndex {
    fn get(&self, key: &[u8]) -> Result<Option<String>> {
        check(&self.fail_get, "get")?;
        self.inner.get(key)
    }
    fn has(&self, key: &[u8]) -> Result<bool> {
        check(&self.fail_has, "has")?;
        self.inner.has(key)
    }
    fn put(&self, key: &[u8], volume: &str) -> Result<()> {
        check(&self.fail_put, "put")?;
        self.inner.put(key, volume)
    }
    fn delete(&self, key: &[u8]) -> Result<()> {
        check(&self.fail_delete, "delete")?;
        self.inner.delete(key)
    }
}
