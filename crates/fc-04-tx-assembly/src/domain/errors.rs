//! # Domain Errors
//!
//! Error types for transaction assembly.

use shared_crypto::CryptoError;
use shared_types::TransportError;
use thiserror::Error;

/// Transaction assembly errors.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A peer call failed before producing a response.
    #[error("Endorsement from {peer} failed: {source}")]
    Endorsement {
        /// Peer that failed
        peer: String,
        /// Transport failure
        source: TransportError,
    },

    /// A peer answered with a non-success chaincode status.
    #[error("Proposal response from {peer} was not successful, status {status}: {message}")]
    BadTransactionStatus {
        /// Peer that answered
        peer: String,
        /// Chaincode status code
        status: i32,
        /// Chaincode message
        message: String,
    },

    /// Simulation payloads are not byte-identical across endorsers.
    #[error("Proposal response payload from {peer} does not match the other endorsements")]
    EndorsementsDoNotMatch {
        /// First peer whose payload differs
        peer: String,
    },

    /// A successful response carried no endorsement.
    #[error("Proposal response from {peer} has no endorsement")]
    MissingEndorsement {
        /// Peer that answered
        peer: String,
    },

    /// Nothing to assemble.
    #[error("No valid endorsement found")]
    NoValidEndorsementFound,

    /// The original proposal could not be decoded.
    #[error("Malformed proposal: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Sealing the payload failed.
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),
}
