//! # Client Errors
//!
//! One error type for the facade, wrapping every component error.

use fc_01_proposal::ProposalError;
use fc_02_endorsement_groups::DiscoveryError;
use fc_03_endorsement::EndorsementError;
use fc_04_tx_assembly::AssemblyError;
use fc_05_orderer_client::OrdererError;
use fc_06_tx_status::TxStatusError;
use shared_types::TransportError;
use thiserror::Error;

/// Errors returned by [`crate::FabricClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building or signing a proposal failed.
    #[error("Proposal error: {0}")]
    Proposal(#[from] ProposalError),

    /// Discovery refresh failed.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Endorsements could not be collected.
    #[error("Endorsement error: {0}")]
    Endorsement(#[from] EndorsementError),

    /// Endorsements were collected but could not be assembled.
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Broadcast or deliver failed.
    #[error("Orderer error: {0}")]
    Orderer(#[from] OrdererError),

    /// Waiting for a commit status failed.
    #[error("Status error: {0}")]
    TxStatus(#[from] TxStatusError),

    /// A peer answered a query with a non-200 status.
    #[error("Query on peer {peer} failed with status {status}: {message}")]
    QueryFailed {
        /// Peer that answered
        peer: String,
        /// Chaincode status
        status: i32,
        /// Chaincode message
        message: String,
    },

    /// A peer could not be reached for a query.
    #[error("Peer {peer} unreachable: {source}")]
    Transport {
        /// Peer name
        peer: String,
        /// Underlying failure
        source: TransportError,
    },

    /// No connected peer is joined to the channel.
    #[error("No connected peers on channel {channel}")]
    NoPeers {
        /// Channel requested
        channel: String,
    },

    /// The channel is not listed in the client configuration.
    #[error("Channel {channel} is not configured")]
    UnknownChannel {
        /// Channel requested
        channel: String,
    },

    /// A query result could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An administrative request is missing a required field.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A peer-scoped call was given no peers to address.
    #[error("No target peers given")]
    NoTargetPeers,
}
