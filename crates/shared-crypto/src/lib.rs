//! # Shared Crypto - Crypto Suite for the Commit Client
//!
//! The protocol only needs two primitives from its crypto collaborator:
//! a hash function (transaction ids) and a signer (proposals, envelopes).
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `suite` | - | `CryptoSuite` port, `PrivateKeyHandle`, mock suite |
//! | `ecdsa` | ECDSA + SHA-256 | Default suite, DER signatures |
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalized, DER-encoded signatures
//! - Private key material is zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod suite;

// Re-exports
pub use ecdsa::{sha256, EcdsaSuite};
pub use errors::CryptoError;
pub use suite::{CryptoSuite, MockCryptoSuite, PrivateKeyHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
