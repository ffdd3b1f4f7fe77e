//! Configuration for mkv components
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! environment variables. Binaries apply CLI flags on top. The index reads
//! `MKV_INDEX_*` and the reference volume reads `MKV_VOLUME_*`, so both can
//! share one environment.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment prefix for [`IndexConfig`]
pub const INDEX_ENV_PREFIX: &str = "MKV_INDEX";
/// Environment prefix for [`VolumeConfig`]
pub const VOLUME_ENV_PREFIX: &str = "MKV_VOLUME";

/// Environment variable pointing at the index's TOML config file
pub const INDEX_CONFIG_ENV: &str = "MKV_INDEX_CONFIG";
/// Environment variable pointing at the reference volume's TOML config file
pub const VOLUME_CONFIG_ENV: &str = "MKV_VOLUME_CONFIG";

type EnvVars = Option<config::Map<String, String>>;

/// Index server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_index_bind")]
    pub bind_addr: SocketAddr,

    /// RocksDB path for the key → volume index
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Volume server addresses (host:port)
    #[serde(default)]
    pub volumes: Vec<String>,

    /// Timeout for outbound calls to volumes
    #[serde(default = "default_volume_timeout")]
    pub volume_timeout_secs: u64,
}

fn default_index_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
fn default_db_path() -> PathBuf {
    PathBuf::from("/tmp/indexdb/")
}
fn default_volume_timeout() -> u64 {
    30
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_index_bind(),
            db_path: default_db_path(),
            volumes: Vec::new(),
            volume_timeout_secs: default_volume_timeout(),
        }
    }
}

impl IndexConfig {
    /// Load from an optional file plus `MKV_INDEX_*` environment variables.
    /// `MKV_INDEX_VOLUMES` is comma-delimited.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, None)
    }

    /// Like [`IndexConfig::load`], reading variables from `env` instead of
    /// the process environment when given.
    fn load_from(file: Option<&Path>, env: EnvVars) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(INDEX_ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("volumes")
                .source(env),
        );
        Ok(builder.build()?.try_deserialize()?)
    }

    /// The only check the index needs before serving: at least one usable volume.
    pub fn validate(&self) -> Result<()> {
        if self.volumes.is_empty() {
            return Err(Error::InvalidConfig(
                "need at least one volume server".into(),
            ));
        }
        if self.volumes.iter().any(|v| v.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "volume list contains an empty entry".into(),
            ));
        }
        Ok(())
    }

    pub fn volume_timeout(&self) -> Duration {
        Duration::from_secs(self.volume_timeout_secs)
    }
}

/// Reference volume server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Bind address for the HTTP API
    #[serde(default = "default_volume_bind")]
    pub bind_addr: SocketAddr,

    /// Root directory for stored values
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_volume_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}
fn default_data_path() -> PathBuf {
    PathBuf::from("/tmp/volume1")
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_volume_bind(),
            data_path: default_data_path(),
        }
    }
}

impl VolumeConfig {
    /// Load from an optional file plus `MKV_VOLUME_*` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_from(file, None)
    }

    fn load_from(file: Option<&Path>, env: EnvVars) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(VOLUME_ENV_PREFIX)
                .try_parsing(true)
                .source(env),
        );
        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Split a comma-delimited volume list, dropping surrounding whitespace.
pub fn parse_volume_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
