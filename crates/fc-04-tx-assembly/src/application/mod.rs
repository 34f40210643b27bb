//! # Application Layer
//!
//! Transaction assembly service.

pub mod service;

pub use service::TransactionAssembler;
