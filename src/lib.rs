//! # mkv
//!
//! The index tier of a sharded object store:
//! - Rendezvous (HRW) hashing places every key on one of a fixed set of volumes
//! - Values live on the volume under a path derived from the key alone
//! - A RocksDB index records which volume holds each key
//! - GET/HEAD redirect to the volume, PUT and DELETE are proxied to it
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────────────────────┐
//!  client ──▶│ Index (mkv-index)            │
//!            │  key → volume (RocksDB)      │
//!            └──────┬───────────┬───────────┘
//!   302 / PUT / DELETE          │
//!         ┌─────────▼──┐   ┌────▼───────┐
//!         │ Volume 1   │   │ Volume 2   │   /aa/bb/<base64(key)>
//!         └────────────┘   └────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Start volumes
//! ```bash
//! mkv-volume serve --bind 0.0.0.0:3001 --data /tmp/volume1
//! mkv-volume serve --bind 0.0.0.0:3002 --data /tmp/volume2
//! ```
//!
//! ### Start the index
//! ```bash
//! mkv-index serve \
//!   --bind 0.0.0.0:3000 \
//!   --db /tmp/indexdb/ \
//!   --volumes localhost:3001,localhost:3002
//! ```
//!
//! ### Use the CLI
//! ```bash
//! mkv put /photos/cat.jpg --file ./cat.jpg
//! mkv get /photos/cat.jpg --output ./out.jpg
//! mkv delete /photos/cat.jpg
//! ```

pub mod common;
pub mod coordinator;
pub mod volume;

// Re-export commonly used types
pub use common::{derive_path, Error, ErrorKind, Result};
pub use coordinator::{select_volume, Coordinator, IndexServer, IndexStore, VolumeSet};
pub use volume::VolumeServer;

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
