//! # FC-05 Orderer Client
//!
//! Submits sealed transaction envelopes to the ordering service and reads
//! blocks back from it.
//!
//! **Component:** 6
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Broadcast
//!
//! One stream per attempt: open, send the envelope, read exactly one
//! response, close. The channel's orderers are tried in configured order;
//! the first success wins and each failure is logged, never retried against
//! the same orderer. Exhausting the list is `OrdererError::AllOrderersFailed`.
//!
//! ## Deliver
//!
//! A fresh stream per call carrying a signed seek envelope. Blocks are
//! buffered until a terminal status arrives; the whole exchange is bounded by
//! `deliver_timeout_secs` (5 seconds by default).
//!
//! ```text
//! Block ──► buffer ──► Status(SUCCESS) ──► Ok(block)
//!                  └─► Status(other)   ──► BadStatus
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! fc-05-orderer-client/
//! ├── domain/          # Deliver response folding, errors
//! ├── ports/           # OrdererApi (inbound), OrdererConnection/streams (outbound)
//! ├── application/     # OrdererClient
//! └── config.rs        # OrdererClientConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::OrdererClient;
pub use config::OrdererClientConfig;
pub use domain::{BlockCollector, DeliverStep, OrdererError};
pub use ports::{
    BroadcastStream, DeliverStream, MockOrderer, MockOrdererConnector, OrdererApi,
    OrdererConnection, OrdererConnector,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
