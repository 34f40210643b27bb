//! # Domain Errors
//!
//! Error types for ordering-service calls.

use fc_01_proposal::ProposalError;
use shared_types::TransportError;
use thiserror::Error;

/// Orderer client errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrdererError {
    /// No orderers are registered for the channel.
    #[error("No orderers configured for channel {channel}")]
    ChannelNotConfigured {
        /// Channel requested
        channel: String,
    },

    /// Every configured orderer failed.
    #[error("All {} orderers failed for channel {channel}", failures.len())]
    AllOrderersFailed {
        /// Channel requested
        channel: String,
        /// One error per attempt, in failover order
        failures: Vec<OrdererError>,
    },

    /// The transport to one orderer failed.
    #[error("Orderer {orderer} transport failure: {source}")]
    Transport {
        /// Orderer attempted
        orderer: String,
        /// Underlying failure
        source: TransportError,
    },

    /// The orderer answered with a non-success status.
    #[error("Orderer {orderer} returned status {status}: {info}")]
    BadStatus {
        /// Orderer attempted
        orderer: String,
        /// Status code
        status: i32,
        /// Additional info from the orderer
        info: String,
    },

    /// The deliver exchange exceeded its deadline.
    #[error("Timeout waiting for response from orderer {orderer} after {timeout_secs}s")]
    Timeout {
        /// Orderer attempted
        orderer: String,
        /// Configured deadline
        timeout_secs: u64,
    },

    /// Deliver ended successfully without a block.
    #[error("Orderer {orderer} reported success without delivering a block")]
    NoBlock {
        /// Orderer attempted
        orderer: String,
    },

    /// The stream ended before a terminal message.
    #[error("Orderer {orderer} closed the stream early")]
    StreamClosed {
        /// Orderer attempted
        orderer: String,
    },

    /// Deliver returned a message of unknown type.
    #[error("Unexpected deliver response from orderer {orderer}")]
    UnexpectedResponse {
        /// Orderer attempted
        orderer: String,
    },

    /// The seek envelope could not be built.
    #[error("Seek envelope: {0}")]
    Proposal(#[from] ProposalError),
}

impl OrdererError {
    /// Name of the orderer the error came from, if it concerns one orderer.
    pub fn orderer(&self) -> Option<&str> {
        match self {
            OrdererError::Transport { orderer, .. }
            | OrdererError::BadStatus { orderer, .. }
            | OrdererError::Timeout { orderer, .. }
            | OrdererError::NoBlock { orderer }
            | OrdererError::StreamClosed { orderer }
            | OrdererError::UnexpectedResponse { orderer } => Some(orderer),
            OrdererError::ChannelNotConfigured { .. }
            | OrdererError::AllOrderersFailed { .. }
            | OrdererError::Proposal(_) => None,
        }
    }

    /// True if the deliver deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, OrdererError::Timeout { .. })
    }
}
