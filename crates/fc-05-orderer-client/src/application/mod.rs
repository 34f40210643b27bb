//! # Application Layer
//!
//! Orderer client service.

pub mod service;

pub use service::OrdererClient;
