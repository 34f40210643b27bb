//! # Crypto Suite Port
//!
//! Outbound port to the cryptographic collaborator. Every component that
//! hashes or signs goes through [`CryptoSuite`], so callers can plug in an
//! HSM-backed or curve-specific implementation.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ecdsa::sha256;
use crate::CryptoError;

/// Hash and sign primitives consumed by the commit client.
pub trait CryptoSuite: Send + Sync {
    /// Hash arbitrary bytes.
    fn hash(&self, message: &[u8]) -> Vec<u8>;

    /// Sign `message` with the key behind `key`.
    fn sign(&self, message: &[u8], key: &PrivateKeyHandle) -> Result<Vec<u8>, CryptoError>;
}

/// Opaque private key material owned by an identity.
///
/// The bytes are interpreted by the suite that signs with them. Memory is
/// wiped when the handle is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKeyHandle(Vec<u8>);

impl PrivateKeyHandle {
    /// Wrap raw key bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw key bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// True if no key material is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKeyHandle(<redacted>)")
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock crypto suite for testing.
///
/// Hashes with SHA-256 and "signs" by hashing `key || message`, which is
/// deterministic and lets tests recompute expected signatures.
#[derive(Clone, Debug, Default)]
pub struct MockCryptoSuite {
    /// Should `sign` fail?
    pub should_fail: bool,
}

impl MockCryptoSuite {
    /// Create a mock suite that signs successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock suite whose signer always fails.
    pub fn failing() -> Self {
        Self { should_fail: true }
    }

    /// Signature the mock produces for `message` under `key`.
    pub fn expected_signature(message: &[u8], key: &PrivateKeyHandle) -> Vec<u8> {
        let mut input = key.expose().to_vec();
        input.extend_from_slice(message);
        sha256(&input).to_vec()
    }
}

impl CryptoSuite for MockCryptoSuite {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        sha256(message).to_vec()
    }

    fn sign(&self, message: &[u8], key: &PrivateKeyHandle) -> Result<Vec<u8>, CryptoError> {
        if self.should_fail {
            return Err(CryptoError::SigningFailed("Mock failure".to_string()));
        }
        if key.is_empty() {
            return Err(CryptoError::InvalidPrivateKey);
        }
        Ok(Self::expected_signature(message, key))
    }
}
