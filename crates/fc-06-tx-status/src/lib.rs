//! # FC-06 Transaction Status Registry
//!
//! Lets a caller wait for the commit status of a transaction it submitted.
//! The block-event source publishes statuses by transaction id; at most one
//! waiter per id receives the status, exactly once.
//!
//! **Component:** 7
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Entry Lifecycle
//!
//! ```text
//! register ──► pending ──► publish ──► delivered (entry removed)
//!                  │
//!                  └─────► unregister / waiter dropped ──► closed (entry removed)
//! ```
//!
//! Every transition happens under one lock and delivery goes through a
//! single-assignment `oneshot` sender, so a publish racing an unregister can
//! only ever find the entry or not find it.
//!
//! ## Module Structure
//!
//! ```text
//! fc-06-tx-status/
//! ├── domain/          # TxStatusEvent, block decoding, errors
//! ├── ports/           # TxStatusApi (inbound)
//! └── application/     # TxStatusRegistry, TxStatusWaiter
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::{TxStatusRegistry, TxStatusWaiter};
pub use domain::{decode_processed_transaction, events_from_block, TxStatusError, TxStatusEvent, TRANSACTIONS_FILTER_INDEX};
pub use ports::TxStatusApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
