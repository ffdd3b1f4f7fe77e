//! Volume placement using HRW (rendezvous) hashing
//!
//! Every volume is scored against the key and the highest score wins. No
//! mapping table is stored: any index holding the same volume list computes
//! the same answer, and dropping a volume only moves the keys it used to win.

use crate::common::{hrw_score, Error, Result};

/// The fixed, non-empty list of volumes the index places keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSet {
    volumes: Vec<String>,
}

impl VolumeSet {
    pub fn new(volumes: Vec<String>) -> Result<Self> {
        if volumes.is_empty() {
            return Err(Error::InvalidConfig(
                "need at least one volume server".into(),
            ));
        }
        if volumes.iter().any(|v| v.is_empty()) {
            return Err(Error::InvalidConfig(
                "volume address must not be empty".into(),
            ));
        }
        Ok(Self { volumes })
    }

    /// Pick the volume for `key`.
    pub fn select(&self, key: &[u8]) -> &str {
        select_volume(key, self)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

/// Highest-random-weight selection. Ties keep the first volume in list order.
pub fn select_volume<'a>(key: &[u8], volumes: &'a VolumeSet) -> &'a str {
    let mut best = volumes.volumes[0].as_str();
    let mut best_score = hrw_score(best, key);
    for volume in &volumes.volumes[1..] {
        let score = hrw_score(volume, key);
        if score > best_score {
            best_score = score;
            best = volume;
        }
    }
    best
}
