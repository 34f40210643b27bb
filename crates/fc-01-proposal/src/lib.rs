//! # FC-01 Proposal Builder
//!
//! Turns a caller's identity and chaincode invocation into the signed
//! proposal peers endorse. Also builds the signed seek envelopes used on
//! the deliver path and the CONFIG_UPDATE envelopes that create or update a
//! channel.
//!
//! **Component:** 1/2 (Identity & Transaction-Id Generator, Proposal Builder)
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! 1. Serialize the identity into a creator descriptor
//! 2. Derive a transaction id from a fresh 24-byte nonce and the creator
//! 3. Encode the invocation spec, channel header and signature header
//! 4. Marshal the proposal and sign it through the crypto suite
//!
//! Nothing here is retried: any serialization or signing failure is returned
//! to the caller, and a resubmission always gets a new transaction id.
//!
//! ## Module Structure
//!
//! ```text
//! fc-01-proposal/
//! ├── domain/          # Identity serialization, tx ids, headers, errors
//! ├── ports/           # ProposalApi (inbound)
//! └── application/     # ProposalBuilder
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::ProposalBuilder;
pub use domain::{
    build_channel_header, build_header, build_signature_header, new_transaction_id,
    serialize_identity,
    ProposalError, CHANNEL_HEADER_VERSION,
};
pub use ports::ProposalApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
