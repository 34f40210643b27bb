//! # Application Module
//!
//! Application service combining the domain helpers with the crypto suite.

pub mod service;

pub use service::ProposalBuilder;
