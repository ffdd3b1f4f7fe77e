//! Index coordinator
//!
//! The coordinator is responsible for:
//! - The key → volume index (RocksDB)
//! - Placement decisions (HRW over a fixed volume list)
//! - Proxying writes and deletes to volumes, redirecting reads

pub mod flow;
pub mod http;
pub mod index;
pub mod placement;
pub mod server;
pub mod volume_client;

pub use flow::Coordinator;
pub use index::{IndexStore, MemoryIndex, RocksIndex};
pub use placement::{select_volume, VolumeSet};
pub use server::IndexServer;
pub use volume_client::VolumeClient;
