//! # ECDSA Suite (SHA-256)
//!
//! Default [`CryptoSuite`]: SHA-256 hashing and ECDSA signatures over the
//! SHA-256 digest of the message, DER encoded as the ordering service and
//! peers expect.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization before encoding
//!
//! Private key handles hold the raw 32-byte scalar.

use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use sha2::{Digest, Sha256};

use crate::suite::{CryptoSuite, PrivateKeyHandle};
use crate::CryptoError;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// ECDSA + SHA-256 crypto suite.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaSuite;

impl EcdsaSuite {
    /// Create the suite.
    pub fn new() -> Self {
        Self
    }

    /// Generate a random private key.
    pub fn generate_key() -> PrivateKeyHandle {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        PrivateKeyHandle::new(signing_key.to_bytes().to_vec())
    }

    /// SEC1 compressed public key for a private key handle.
    pub fn public_key(key: &PrivateKeyHandle) -> Result<Vec<u8>, CryptoError> {
        let signing_key = signing_key(key)?;
        Ok(signing_key.verifying_key().to_sec1_bytes().to_vec())
    }

    /// Verify a DER signature against a SEC1 public key.
    pub fn verify(
        &self,
        message: &[u8],
        signature_der: &[u8],
        public_key: &[u8],
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig =
            Signature::from_der(signature_der).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

fn signing_key(key: &PrivateKeyHandle) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(key.expose()).map_err(|_| CryptoError::InvalidPrivateKey)
}

impl CryptoSuite for EcdsaSuite {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        sha256(message).to_vec()
    }

    fn sign(&self, message: &[u8], key: &PrivateKeyHandle) -> Result<Vec<u8>, CryptoError> {
        let signing_key = signing_key(key)?;
        let sig: Signature = signing_key.sign(message);
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_der().as_bytes().to_vec())
    }
}
