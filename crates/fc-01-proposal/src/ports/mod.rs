//! # Ports Module
//!
//! The builder's only outbound dependency is the crypto suite, which lives
//! in `shared-crypto`; this module holds the inbound API.

pub mod inbound;

pub use inbound::*;
