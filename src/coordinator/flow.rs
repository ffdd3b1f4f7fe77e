//! Request flows of the index
//!
//! GET/HEAD resolve a key to its volume URL. PUT places a new key on a volume
//! and indexes it once the volume confirms. DELETE unindexes and then deletes
//! from the volume.
//!
//! Every flow abandons at the first failure. Two windows are left open:
//! - a PUT whose index write fails leaves the value orphaned on the volume;
//! - a DELETE whose volume call fails leaves the value on the volume with no
//!   index entry pointing at it.
//!
//! Concurrent PUTs of the same new key both pass the existence check; the
//! later index write wins and the other volume copy is orphaned.

use crate::common::{derive_path, display_key, Error, Result};
use crate::coordinator::index::IndexStore;
use crate::coordinator::placement::VolumeSet;
use crate::coordinator::volume_client::{volume_url, VolumeClient};
use reqwest::Body;
use std::sync::Arc;

pub struct Coordinator {
    index: Arc<dyn IndexStore>,
    volumes: VolumeSet,
    client: VolumeClient,
}

impl Coordinator {
    pub fn new(index: Arc<dyn IndexStore>, volumes: VolumeSet, client: VolumeClient) -> Self {
        Self {
            index,
            volumes,
            client,
        }
    }

    /// Volume currently assigned to `key`
    fn lookup(&self, key: &[u8]) -> Result<String> {
        self.index
            .get(key)?
            .ok_or_else(|| Error::NotFound(display_key(key)))
    }

    /// Resolve `key` to the URL of its value on the owning volume.
    pub fn locate(&self, key: &[u8]) -> Result<String> {
        let volume = self.lookup(key)?;
        Ok(volume_url(&volume, &derive_path(key)))
    }

    /// Create `key` with the given body. Returns the volume it was placed on.
    ///
    /// `content_length` must be known and non-zero; the body is streamed to the
    /// volume unchanged with that length.
    pub async fn create(
        &self,
        key: &[u8],
        body: impl Into<Body>,
        content_length: Option<u64>,
    ) -> Result<String> {
        let content_length = match content_length {
            Some(len) if len > 0 => len,
            _ => return Err(Error::LengthRequired),
        };

        if self.index.has(key)? {
            return Err(Error::Conflict(display_key(key)));
        }

        let path = derive_path(key);
        let volume = self.volumes.select(key);

        // On failure the volume may or may not hold the bytes; nothing is undone.
        self.client
            .store(volume, &path, body, content_length)
            .await?;

        if let Err(e) = self.index.put(key, volume) {
            tracing::warn!(
                key = %display_key(key),
                volume = %volume,
                path = %path,
                "Value stored on volume but index write failed, value is orphaned"
            );
            return Err(e);
        }

        tracing::debug!(key = %display_key(key), volume = %volume, "Key created");
        Ok(volume.to_string())
    }

    /// Remove `key` from the index, then from its volume.
    pub async fn remove(&self, key: &[u8]) -> Result<()> {
        let volume = self.lookup(key)?;
        let path = derive_path(key);

        self.index.delete(key)?;

        if let Err(e) = self.client.remove(&volume, &path).await {
            tracing::warn!(
                key = %display_key(key),
                volume = %volume,
                path = %path,
                error = %e,
                "Key unindexed but volume delete failed, value is orphaned"
            );
            return Err(e);
        }

        tracing::debug!(key = %display_key(key), volume = %volume, "Key deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::index::MemoryIndex;
    use std::time::Duration;

    fn coordinator(index: Arc<MemoryIndex>) -> Coordinator {
        Coordinator::new(
            index,
            VolumeSet::new(vec!["v1".into(), "v2".into()]).unwrap(),
            VolumeClient::new(Duration::from_secs(1)).unwrap(),
        )
    }

    #[test]
    fn test_locate_indexed_key() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/abc", "v2").unwrap();
        let coord = coordinator(index);

        assert_eq!(coord.locate(b"/abc").unwrap(), "http://v2/48/2a/L2FiYw==");
    }

    #[test]
    fn test_locate_missing_key() {
        let coord = coordinator(Arc::new(MemoryIndex::new()));
        assert!(matches!(coord.locate(b"/nope"), Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_requires_length() {
        let coord = coordinator(Arc::new(MemoryIndex::new()));
        for len in [None, Some(0)] {
            let err = coord.create(b"/k", "", len).await.unwrap_err();
            assert!(matches!(err, Error::LengthRequired));
        }
    }

    #[tokio::test]
    async fn test_create_existing_key_conflicts_before_volume_call() {
        let index = Arc::new(MemoryIndex::new());
        index.put(b"/k", "v1").unwrap();
        let coord = coordinator(index.clone());

        // "v1" does not resolve, so reaching the volume would be a transport error.
        let err = coord.create(b"/k", "data", Some(4)).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(index.get(b"/k").unwrap().as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn test_remove_missing_key() {
        let coord = coordinator(Arc::new(MemoryIndex::new()));
        assert!(matches!(
            coord.remove(b"/nope").await,
            Err(Error::NotFound(_))
        ));
    }
}
