//! # Wire Messages
//!
//! Protobuf messages exchanged with peers and ordering nodes, grouped by
//! upstream package. Tags match the upstream `.proto` files.

pub mod common;
pub mod msp;
pub mod orderer;
pub mod peer;

pub use prost::Message;
