//! # FC-02 Endorsement Group Resolver
//!
//! Converts the endorsement descriptors returned by discovery into
//! [`EndorsementLayout`]s and stores them in an [`EndorsementGroupTable`]
//! keyed by channel and chaincode.
//!
//! **Component:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Layout Semantics
//!
//! A policy resolves to a set of layouts (logical OR). Each layout lists the
//! organizations that must each contribute one endorsement (logical AND).
//!
//! ## Table Lifecycle
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | refresh | Resolve every requested chaincode, then swap all entries at once |
//! | lookup | Returns an immutable snapshot (`Arc<[EndorsementLayout]>`) |
//! | failed refresh | Prior entries stay untouched |
//!
//! ## Module Structure
//!
//! ```text
//! fc-02-endorsement-groups/
//! ├── domain/          # Descriptors, layouts, table, channel config, errors
//! ├── ports/           # EndorsementGroupApi (inbound), DiscoveryClient (outbound)
//! └── application/     # EndorsementGroupResolver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::EndorsementGroupResolver;
pub use domain::{
    orderer_endpoints, parse_interests, resolve_layouts, ChaincodeInterest, ChannelConfig,
    ChannelPeer, DiscoveryError, EndorsementDescriptor, EndorsementGroupTable, EndorsementLayout,
    Endorser, Endpoint, Layout, MspInfo, OrdererEndpoint, PeerEndpoint, ResolvedChannel,
};
pub use ports::{DiscoveryClient, EndorsementGroupApi, MockDiscoveryClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
