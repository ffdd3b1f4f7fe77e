//! Reference volume server
//!
//! A plain HTTP file store honouring the contract the index relies on:
//! PUT answers 201, DELETE answers 204, GET returns the stored bytes.
//! Any server with the same behaviour (nginx with WebDAV PUT/DELETE, for
//! instance) can stand in for it.

pub mod http;
pub mod server;

pub use server::VolumeServer;
