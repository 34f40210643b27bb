//! Messages from the `peer` package: proposals, responses and transactions.

use std::collections::BTreeMap;

use super::common::{Envelope, Timestamp};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeId {
    #[prost(string, tag = "1")]
    pub path: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub version: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeInput {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub args: Vec<Vec<u8>>,
    #[prost(btree_map = "string, bytes", tag = "2")]
    pub decorations: BTreeMap<String, Vec<u8>>,
    #[prost(bool, tag = "3")]
    pub is_init: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeSpec {
    #[prost(enumeration = "chaincode_spec::Type", tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub chaincode_id: Option<ChaincodeId>,
    #[prost(message, optional, tag = "3")]
    pub input: Option<ChaincodeInput>,
    #[prost(int32, tag = "4")]
    pub timeout: i32,
}

/// Nested types for [`ChaincodeSpec`].
pub mod chaincode_spec {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        Undefined = 0,
        Golang = 1,
        Node = 2,
        Car = 3,
        Java = 4,
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeInvocationSpec {
    #[prost(message, optional, tag = "1")]
    pub chaincode_spec: Option<ChaincodeSpec>,
}

/// Chaincode source package as installed on a peer.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeDeploymentSpec {
    #[prost(message, optional, tag = "1")]
    pub chaincode_spec: Option<ChaincodeSpec>,
    #[prost(bytes = "vec", tag = "3")]
    pub code_package: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeInfo {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(string, tag = "3")]
    pub path: String,
    #[prost(string, tag = "4")]
    pub input: String,
    #[prost(string, tag = "5")]
    pub escc: String,
    #[prost(string, tag = "6")]
    pub vscc: String,
    #[prost(bytes = "vec", tag = "7")]
    pub id: Vec<u8>,
}

/// Answer of the `getinstalledchaincodes` and `getchaincodes` lifecycle
/// queries.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeQueryResponse {
    #[prost(message, repeated, tag = "1")]
    pub chaincodes: Vec<ChaincodeInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelInfo {
    #[prost(string, tag = "1")]
    pub channel_id: String,
}

/// Answer of the `GetChannels` configuration query.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelQueryResponse {
    #[prost(message, repeated, tag = "1")]
    pub channels: Vec<ChannelInfo>,
}

/// Channel-header extension naming the invoked chaincode.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeHeaderExtension {
    #[prost(message, optional, tag = "2")]
    pub chaincode_id: Option<ChaincodeId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeProposalPayload {
    #[prost(bytes = "vec", tag = "1")]
    pub input: Vec<u8>,
    #[prost(btree_map = "string, bytes", tag = "2")]
    pub transient_map: BTreeMap<String, Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Proposal {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub extension: Vec<u8>,
}

/// Marshaled proposal plus the creator's signature over it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedProposal {
    #[prost(bytes = "vec", tag = "1")]
    pub proposal_bytes: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(bytes = "vec", tag = "3")]
    pub payload: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Endorsement {
    #[prost(bytes = "vec", tag = "1")]
    pub endorser: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

/// A peer's answer to a proposal: chaincode response, simulation payload and
/// endorsement signature.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProposalResponse {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub response: Option<Response>,
    #[prost(bytes = "vec", tag = "5")]
    pub payload: Vec<u8>,
    #[prost(message, optional, tag = "6")]
    pub endorsement: Option<Endorsement>,
}

impl ProposalResponse {
    /// Chaincode status code, zero when no response is attached.
    pub fn status(&self) -> i32 {
        self.response.as_ref().map(|r| r.status).unwrap_or_default()
    }

    /// Chaincode message, empty when no response is attached.
    pub fn message(&self) -> &str {
        self.response.as_ref().map(|r| r.message.as_str()).unwrap_or_default()
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeEndorsedAction {
    #[prost(bytes = "vec", tag = "1")]
    pub proposal_response_payload: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub endorsements: Vec<Endorsement>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChaincodeActionPayload {
    #[prost(bytes = "vec", tag = "1")]
    pub chaincode_proposal_payload: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub action: Option<ChaincodeEndorsedAction>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionAction {
    #[prost(bytes = "vec", tag = "1")]
    pub header: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub payload: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(message, repeated, tag = "1")]
    pub actions: Vec<TransactionAction>,
}

/// A committed transaction envelope with its validation verdict.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProcessedTransaction {
    #[prost(message, optional, tag = "1")]
    pub transaction_envelope: Option<Envelope>,
    #[prost(int32, tag = "2")]
    pub validation_code: i32,
}

/// Commit-time validation verdict of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TxValidationCode {
    Valid = 0,
    NilEnvelope = 1,
    BadPayload = 2,
    BadCommonHeader = 3,
    BadCreatorSignature = 4,
    InvalidEndorserTransaction = 5,
    InvalidConfigTransaction = 6,
    UnsupportedTxPayload = 7,
    BadProposalTxid = 8,
    DuplicateTxid = 9,
    EndorsementPolicyFailure = 10,
    MvccReadConflict = 11,
    PhantomReadConflict = 12,
    UnknownTxType = 13,
    TargetChainNotFound = 14,
    MarshalTxError = 15,
    NilTxaction = 16,
    ExpiredChaincode = 17,
    ChaincodeVersionConflict = 18,
    BadHeaderExtension = 19,
    BadChannelHeader = 20,
    BadResponsePayload = 21,
    BadRwset = 22,
    IllegalWriteset = 23,
    InvalidWriteset = 24,
    InvalidChaincode = 25,
    NotValidated = 254,
    InvalidOtherReason = 255,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_proposal_response_accessors() {
        let resp = ProposalResponse {
            response: Some(Response {
                status: 500,
                message: "boom".to_string(),
                payload: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.message(), "boom");
        assert_eq!(ProposalResponse::default().status(), 0);
    }

    #[test]
    fn test_transient_map_encoding_is_ordered() {
        let mut a = ChaincodeProposalPayload::default();
        a.transient_map.insert("z".to_string(), vec![1]);
        a.transient_map.insert("a".to_string(), vec![2]);

        let mut b = ChaincodeProposalPayload::default();
        b.transient_map.insert("a".to_string(), vec![2]);
        b.transient_map.insert("z".to_string(), vec![1]);

        assert_eq!(a.encode_to_vec(), b.encode_to_vec());
    }

    #[test]
    fn test_deployment_spec_skips_retired_tag() {
        let spec = ChaincodeDeploymentSpec {
            chaincode_spec: None,
            code_package: vec![0xAB],
        };
        // field 3, length 1
        assert_eq!(spec.encode_to_vec(), vec![0x1A, 0x01, 0xAB]);
    }

    #[test]
    fn test_validation_code_from_wire() {
        assert_eq!(TxValidationCode::try_from(11).ok(), Some(TxValidationCode::MvccReadConflict));
        assert_eq!(TxValidationCode::try_from(255).ok(), Some(TxValidationCode::InvalidOtherReason));
        assert!(TxValidationCode::try_from(100).is_err());
    }
}
