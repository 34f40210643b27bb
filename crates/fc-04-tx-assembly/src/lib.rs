//! # FC-04 Transaction Assembler
//!
//! Checks that the collected endorsements agree and folds them, together
//! with the original proposal, into the transaction payload that is signed
//! and submitted to the ordering service.
//!
//! **Component:** 5
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Acceptance Rules
//!
//! | Response | Outcome |
//! |----------|---------|
//! | transport error | `AssemblyError::Endorsement` (immediately) |
//! | status != 200 | `AssemblyError::BadTransactionStatus` |
//! | payload differs from the first | `AssemblyError::EndorsementsDoNotMatch` |
//! | no response at all | `AssemblyError::NoValidEndorsementFound` |
//!
//! The transient map of the original proposal never leaves this stage.
//!
//! ## Module Structure
//!
//! ```text
//! fc-04-tx-assembly/
//! ├── domain/          # Response validation, payload assembly, errors
//! ├── ports/           # TransactionAssemblyApi (inbound)
//! └── application/     # TransactionAssembler
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::TransactionAssembler;
pub use domain::{assemble_transaction, validate_responses, AcceptedEndorsements, AssemblyError};
pub use ports::TransactionAssemblyApi;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
