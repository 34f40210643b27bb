//! Cryptographic error types.

use thiserror::Error;

/// Errors produced by a crypto suite.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The private key handle does not hold a usable key.
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature bytes could not be parsed.
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Signing failed inside the suite.
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
