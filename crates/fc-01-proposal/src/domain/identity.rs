//! Creator serialization and transaction-id derivation.

use prost::Message;
use rand::RngCore;
use shared_crypto::CryptoSuite;
use shared_types::protos::msp::SerializedIdentity;
use shared_types::{Identity, TransactionId, NONCE_SIZE};

use super::ProposalError;

/// Serialize an identity into the creator bytes carried by signature headers.
pub fn serialize_identity(identity: &Identity) -> Result<Vec<u8>, ProposalError> {
    if identity.msp_id.is_empty() {
        return Err(ProposalError::Identity("MSP id is empty".to_string()));
    }
    if identity.certificate.is_empty() {
        return Err(ProposalError::Identity(format!(
            "certificate missing for MSP {}",
            identity.msp_id
        )));
    }

    let serialized = SerializedIdentity {
        mspid: identity.msp_id.clone(),
        id_bytes: identity.certificate.clone(),
    };
    Ok(serialized.encode_to_vec())
}

/// Fresh random nonce.
pub fn generate_nonce() -> Vec<u8> {
    let mut nonce = vec![0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Derive a new transaction id: `hex(hash(nonce || creator))`.
pub fn new_transaction_id(creator: &[u8], crypto: &dyn CryptoSuite) -> TransactionId {
    let nonce = generate_nonce();
    let mut preimage = Vec::with_capacity(nonce.len() + creator.len());
    preimage.extend_from_slice(&nonce);
    preimage.extend_from_slice(creator);
    let digest = crypto.hash(&preimage);
    TransactionId::from_parts(nonce, creator.to_vec(), &digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::{sha256, MockCryptoSuite, PrivateKeyHandle};

    fn identity(msp: &str) -> Identity {
        Identity::new(msp, b"-----BEGIN CERTIFICATE-----".to_vec(), PrivateKeyHandle::new(vec![7; 32]))
    }

    #[test]
    fn test_serialize_identity() {
        let bytes = serialize_identity(&identity("Org1MSP")).unwrap();
        let decoded = SerializedIdentity::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.mspid, "Org1MSP");
        assert_eq!(decoded.id_bytes, b"-----BEGIN CERTIFICATE-----");
    }

    #[test]
    fn test_empty_msp_rejected() {
        let err = serialize_identity(&identity("")).unwrap_err();
        assert!(matches!(err, ProposalError::Identity(_)));
    }

    #[test]
    fn test_missing_certificate_rejected() {
        let id = Identity::new("Org1MSP", Vec::new(), PrivateKeyHandle::new(vec![1]));
        assert!(matches!(serialize_identity(&id), Err(ProposalError::Identity(_))));
    }

    #[test]
    fn test_transaction_id_is_hash_of_nonce_and_creator() {
        let crypto = MockCryptoSuite::new();
        let tx_id = new_transaction_id(b"creator", &crypto);

        let mut preimage = tx_id.nonce().to_vec();
        preimage.extend_from_slice(b"creator");
        assert_eq!(tx_id.as_str(), hex::encode(sha256(&preimage)));
        assert_eq!(tx_id.nonce().len(), NONCE_SIZE);
        assert_eq!(tx_id.creator(), b"creator");
    }

    #[test]
    fn test_transaction_ids_are_fresh() {
        let crypto = MockCryptoSuite::new();
        let a = new_transaction_id(b"creator", &crypto);
        let b = new_transaction_id(b"creator", &crypto);
        assert_ne!(a, b);
        assert_ne!(a.nonce(), b.nonce());
    }
}
