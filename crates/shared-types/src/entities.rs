//! # Core Domain Entities
//!
//! Values the caller hands to the client and the transaction identifier the
//! client hands back.
//!
//! ## Clusters
//!
//! - **Identity**: `Identity`, `MspId`
//! - **Invocation**: `ChaincodeInvocation`, `ChaincodeType`
//! - **Correlation**: `TransactionId`

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use shared_crypto::PrivateKeyHandle;

use crate::protos::peer::chaincode_spec;

/// Membership service provider identifier of an organization.
pub type MspId = String;

/// Size of the random nonce mixed into every transaction id.
pub const NONCE_SIZE: usize = 24;

// =============================================================================
// IDENTITY
// =============================================================================

/// A signing identity: MSP id, PEM certificate and private key.
#[derive(Clone, Debug)]
pub struct Identity {
    /// Owning organization.
    pub msp_id: MspId,
    /// PEM-encoded X.509 certificate.
    pub certificate: Vec<u8>,
    /// Key used by the crypto suite to sign on behalf of this identity.
    pub private_key: PrivateKeyHandle,
}

impl Identity {
    /// Create an identity.
    pub fn new(
        msp_id: impl Into<MspId>,
        certificate: impl Into<Vec<u8>>,
        private_key: PrivateKeyHandle,
    ) -> Self {
        Self {
            msp_id: msp_id.into(),
            certificate: certificate.into(),
            private_key,
        }
    }
}

// =============================================================================
// INVOCATION
// =============================================================================

/// Chaincode runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChaincodeType {
    /// Go chaincode.
    #[default]
    Golang,
    /// Node.js chaincode.
    Node,
    /// Chaincode archive.
    Car,
    /// Java chaincode.
    Java,
}

impl From<ChaincodeType> for chaincode_spec::Type {
    fn from(value: ChaincodeType) -> Self {
        match value {
            ChaincodeType::Golang => chaincode_spec::Type::Golang,
            ChaincodeType::Node => chaincode_spec::Type::Node,
            ChaincodeType::Car => chaincode_spec::Type::Car,
            ChaincodeType::Java => chaincode_spec::Type::Java,
        }
    }
}

/// One chaincode call. The first argument is conventionally the function name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaincodeInvocation {
    /// Target channel.
    pub channel_id: String,
    /// Target chaincode.
    pub chaincode_name: String,
    /// Chaincode runtime.
    pub chaincode_type: ChaincodeType,
    /// Ordered arguments.
    pub args: Vec<Vec<u8>>,
    /// Private inputs, visible to endorsers only.
    pub transient_map: BTreeMap<String, Vec<u8>>,
}

impl ChaincodeInvocation {
    /// Create an invocation with no transient data.
    pub fn new<I, A>(channel_id: impl Into<String>, chaincode_name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Vec<u8>>,
    {
        Self {
            channel_id: channel_id.into(),
            chaincode_name: chaincode_name.into(),
            chaincode_type: ChaincodeType::default(),
            args: args.into_iter().map(Into::into).collect(),
            transient_map: BTreeMap::new(),
        }
    }

    /// Set the chaincode runtime.
    pub fn with_type(mut self, chaincode_type: ChaincodeType) -> Self {
        self.chaincode_type = chaincode_type;
        self
    }

    /// Add one transient entry.
    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient_map.insert(key.into(), value.into());
        self
    }

    /// The function selector, if any.
    pub fn function(&self) -> Option<&[u8]> {
        self.args.first().map(Vec::as_slice)
    }
}

// =============================================================================
// CORRELATION
// =============================================================================

/// Per-proposal transaction identifier.
///
/// `id` is the lowercase hex hash of `nonce || creator`; it is the key used by
/// the status registry, by queries and by the committed block.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TransactionId {
    nonce: Vec<u8>,
    creator: Vec<u8>,
    id: String,
}

impl TransactionId {
    /// Assemble from already computed parts.
    pub fn from_parts(nonce: Vec<u8>, creator: Vec<u8>, digest: &[u8]) -> Self {
        Self {
            nonce,
            creator,
            id: hex::encode(digest),
        }
    }

    /// Random nonce.
    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Serialized creator identity.
    pub fn creator(&self) -> &[u8] {
        &self.creator
    }

    /// Hex identifier.
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.id)
    }
}
