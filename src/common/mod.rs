//! Common utilities and types shared across mkv

pub mod config;
pub mod error;
pub mod hash;
pub mod tracing_middleware;
pub mod utils;

pub use self::config::{parse_volume_list, IndexConfig, VolumeConfig};
pub use error::{Error, ErrorKind, Result};
pub use hash::{decode_path, derive_path, hrw_score};
pub use utils::{display_key, format_bytes, key_from_path, key_to_path};
