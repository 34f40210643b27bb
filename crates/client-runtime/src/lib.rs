//! # Client Runtime
//!
//! Facade over the commit-client components. Owns the endorsement group
//! table, the peer and orderer connection pools and the status registry, and
//! exposes the operations an application calls.
//!
//! **Architecture:** Composition root (wires FC-01 through FC-06)
//!
//! ## Operations
//!
//! | Operation | Path |
//! |-----------|------|
//! | `refresh_channel` | discovery → group table, peer pools, orderer list |
//! | `invoke` | proposal → quorum endorsement → assembly → broadcast |
//! | `invoke_and_wait` | as `invoke`, then wait on the status registry |
//! | `query` | proposal → single endorser |
//! | `query_chain_height` / `query_transaction` | `qscc` on every channel peer |
//! | `fetch_genesis_block` | signed seek → deliver |
//! | `join_channel` / `query_channels` | `cscc` on listed peers |
//! | `install_chaincode` / `query_installed_chaincodes` | `lscc` on listed peers |
//! | `instantiate_chaincode` | `lscc` on every channel peer → assembly → broadcast |
//! | `query_instantiated_chaincodes` | `lscc` on every channel peer |
//! | `update_channel` | signed config update → broadcast |
//!
//! ## Module Structure
//!
//! ```text
//! client-runtime/
//! ├── admin.rs       # channel join/update, chaincode lifecycle
//! ├── client.rs      # FabricClient, ClientPorts, responses
//! ├── config.rs      # ClientConfig, FC_* overrides
//! ├── errors.rs      # ClientError
//! └── telemetry.rs   # tracing subscriber setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod admin;
pub mod client;
pub mod config;
pub mod errors;
pub mod telemetry;

// Re-exports
pub use admin::{InstallRequest, InstantiateRequest, LifecycleOperation, CSCC, LSCC};
pub use client::{ClientPorts, FabricClient, InvokeResponse, PeerQueryResult, QueryResponse, QSCC};
pub use config::ClientConfig;
pub use errors::ClientError;
pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
