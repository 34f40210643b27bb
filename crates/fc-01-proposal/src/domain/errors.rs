//! # Domain Errors
//!
//! Error types for proposal and envelope construction.

use shared_crypto::CryptoError;
use thiserror::Error;

/// Proposal construction errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProposalError {
    /// Identity is missing an MSP id or certificate.
    #[error("Invalid identity: {0}")]
    Identity(String),

    /// Invocation cannot be encoded (missing channel or chaincode name).
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    /// Signing through the crypto suite failed.
    #[error("Signing failed: {0}")]
    Signing(#[from] CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_message() {
        let err = ProposalError::Identity("MSP id is empty".to_string());
        assert!(err.to_string().contains("MSP id"));
    }

    #[test]
    fn test_signing_error_from_crypto() {
        let err: ProposalError = CryptoError::InvalidPrivateKey.into();
        assert!(err.to_string().contains("private key"));
    }
}
