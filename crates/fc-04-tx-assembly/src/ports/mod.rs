//! # Ports Module
//!
//! Hexagonal architecture ports (inbound API).

pub mod inbound;

pub use inbound::*;
