//! # Adapters
//!
//! Concrete implementations of the outbound ports.

pub mod peer_directory;

pub use peer_directory::InMemoryPeerDirectory;
