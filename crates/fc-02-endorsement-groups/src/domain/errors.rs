//! # Domain Errors
//!
//! Error types for discovery-driven group resolution.

use thiserror::Error;

/// Discovery and resolution errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// Discovery returned no endorsing peers for the channel.
    #[error("Channel {channel} does not have any available peer")]
    NoPeers {
        /// Channel queried
        channel: String,
    },

    /// A chaincode resolved to no usable layout.
    #[error("Chaincode {chaincode} on channel {channel} has no endorsement layout")]
    NoLayouts {
        /// Channel queried
        channel: String,
        /// Chaincode without layouts
        chaincode: String,
    },

    /// A collection was configured for a chaincode that was not requested.
    #[error("Collection specified for chaincode {chaincode} which was not requested")]
    UnknownCollection {
        /// Chaincode named by the collection entry
        chaincode: String,
    },

    /// Channel config lists no orderer endpoints.
    #[error("Channel {channel} does not have any orderer")]
    NoOrderers {
        /// Channel queried
        channel: String,
    },

    /// The discovery service could not be reached or answered with an error.
    #[error("Discovery request failed: {0}")]
    Transport(String),
}
