//! # Domain Errors
//!
//! Error types for endorsement collection.

use thiserror::Error;

/// Endorsement collection errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndorsementError {
    /// The group table has no entry for this channel/chaincode.
    #[error("No endorsement groups for chaincode {chaincode} on channel {channel}")]
    UnknownChaincode {
        /// Channel requested
        channel: String,
        /// Chaincode requested
        chaincode: String,
    },

    /// No layout could be fully satisfied.
    #[error("Endorsement quorum not reached for {chaincode} on {channel}: {collected} of {required} organizations answered")]
    QuorumNotReached {
        /// Channel requested
        channel: String,
        /// Chaincode requested
        chaincode: String,
        /// Organizations in the target layout
        required: usize,
        /// Organizations that answered across all attempts
        collected: usize,
    },

    /// No organization had a ready, responsive peer.
    #[error("No available peer for {chaincode} on channel {channel}")]
    NoAvailablePeer {
        /// Channel requested
        channel: String,
        /// Chaincode requested
        chaincode: String,
    },

    /// The collection deadline expired.
    #[error("Endorsement timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured deadline
        timeout_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_error_message() {
        let err = EndorsementError::QuorumNotReached {
            channel: "ch1".to_string(),
            chaincode: "cc1".to_string(),
            required: 2,
            collected: 1,
        };
        assert!(err.to_string().contains("1 of 2"));
    }

    #[test]
    fn test_timeout_message() {
        let err = EndorsementError::Timeout { timeout_ms: 250 };
        assert!(err.to_string().contains("250ms"));
    }
}
