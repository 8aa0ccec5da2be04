//! HTTP transport for metadata and data queries.
//!
//! Enabled with the `server` feature.

mod server;

pub use server::*;
