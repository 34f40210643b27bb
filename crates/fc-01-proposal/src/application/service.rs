//! # Proposal Builder Service
//!
//! Encodes invocations into signed proposals, and seek requests and channel
//! config updates into signed envelopes.

use std::sync::Arc;

use prost::Message;
use shared_crypto::CryptoSuite;
use shared_types::protos::common::{ConfigSignature, ConfigUpdateEnvelope, Envelope, HeaderType, Payload};
use shared_types::protos::orderer::SeekInfo;
use shared_types::protos::peer::{
    chaincode_spec, ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec, ChaincodeProposalPayload,
    ChaincodeSpec, Proposal, SignedProposal,
};
use shared_types::{ChaincodeInvocation, Identity, TransactionId};
use tracing::debug;

use crate::domain::{
    build_channel_header, build_header, build_signature_header, new_transaction_id,
    serialize_identity, ProposalError,
};
use crate::ports::ProposalApi;

/// Proposal Builder - signs proposals and orderer envelopes for an identity.
#[derive(Clone)]
pub struct ProposalBuilder {
    crypto: Arc<dyn CryptoSuite>,
}

impl ProposalBuilder {
    /// Create a builder backed by `crypto`.
    pub fn new(crypto: Arc<dyn CryptoSuite>) -> Self {
        Self { crypto }
    }

    /// The crypto suite used for hashing and signing.
    pub fn crypto(&self) -> &Arc<dyn CryptoSuite> {
        &self.crypto
    }

    fn invocation_spec(invocation: &ChaincodeInvocation) -> ChaincodeInvocationSpec {
        let chaincode_type: chaincode_spec::Type = invocation.chaincode_type.into();
        ChaincodeInvocationSpec {
            chaincode_spec: Some(ChaincodeSpec {
                r#type: chaincode_type as i32,
                chaincode_id: Some(ChaincodeId {
                    name: invocation.chaincode_name.clone(),
                    ..Default::default()
                }),
                input: Some(ChaincodeInput {
                    args: invocation.args.clone(),
                    ..Default::default()
                }),
                timeout: 0,
            }),
        }
    }

    fn validate(invocation: &ChaincodeInvocation) -> Result<(), ProposalError> {
        if invocation.channel_id.is_empty() {
            return Err(ProposalError::InvalidInvocation("channel id is empty".to_string()));
        }
        if invocation.chaincode_name.is_empty() {
            return Err(ProposalError::InvalidInvocation(
                "chaincode name is empty".to_string(),
            ));
        }
        Ok(())
    }

    fn signed_proposal(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<(SignedProposal, TransactionId), ProposalError> {
        let creator = serialize_identity(identity)?;
        let tx_id = new_transaction_id(&creator, self.crypto.as_ref());

        let channel_header = build_channel_header(
            HeaderType::EndorserTransaction,
            &invocation.channel_id,
            &tx_id,
            Some(&invocation.chaincode_name),
        );
        let signature_header = build_signature_header(&tx_id);
        let header = build_header(&channel_header, &signature_header);

        let payload = ChaincodeProposalPayload {
            input: Self::invocation_spec(invocation).encode_to_vec(),
            transient_map: invocation.transient_map.clone(),
        };
        let proposal = Proposal {
            header: header.encode_to_vec(),
            payload: payload.encode_to_vec(),
            extension: Vec::new(),
        };

        let proposal_bytes = proposal.encode_to_vec();
        let signature = self.crypto.sign(&proposal_bytes, &identity.private_key)?;

        debug!(
            tx_id = %tx_id,
            channel = %invocation.channel_id,
            chaincode = %invocation.chaincode_name,
            args = invocation.args.len(),
            "Proposal built"
        );

        Ok((
            SignedProposal {
                proposal_bytes,
                signature,
            },
            tx_id,
        ))
    }
}

impl ProposalApi for ProposalBuilder {
    fn build_proposal(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<(SignedProposal, TransactionId), ProposalError> {
        Self::validate(invocation)?;
        self.signed_proposal(identity, invocation)
    }

    fn build_peer_proposal(
        &self,
        identity: &Identity,
        chaincode: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<(SignedProposal, TransactionId), ProposalError> {
        if chaincode.is_empty() {
            return Err(ProposalError::InvalidInvocation(
                "chaincode name is empty".to_string(),
            ));
        }
        let invocation = ChaincodeInvocation::new("", chaincode, args);
        self.signed_proposal(identity, &invocation)
    }

    fn build_config_update_envelope(
        &self,
        identity: &Identity,
        channel_id: &str,
        mut update: ConfigUpdateEnvelope,
    ) -> Result<Envelope, ProposalError> {
        if channel_id.is_empty() {
            return Err(ProposalError::InvalidInvocation("channel id is empty".to_string()));
        }
        let creator = serialize_identity(identity)?;

        // The approval signature covers its own header followed by the update.
        let approval_id = new_transaction_id(&creator, self.crypto.as_ref());
        let approval_header = build_signature_header(&approval_id).encode_to_vec();
        let mut signed = approval_header.clone();
        signed.extend_from_slice(&update.config_update);
        update.signatures.push(ConfigSignature {
            signature: self.crypto.sign(&signed, &identity.private_key)?,
            signature_header: approval_header,
        });

        let tx_id = new_transaction_id(&creator, self.crypto.as_ref());
        let channel_header = build_channel_header(HeaderType::ConfigUpdate, channel_id, &tx_id, None);
        let payload = Payload {
            header: Some(build_header(&channel_header, &build_signature_header(&tx_id))),
            data: update.encode_to_vec(),
        }
        .encode_to_vec();
        let signature = self.crypto.sign(&payload, &identity.private_key)?;

        debug!(channel = %channel_id, tx_id = %tx_id, signatures = update.signatures.len(), "Config update envelope built");

        Ok(Envelope { payload, signature })
    }

    fn build_seek_envelope(
        &self,
        identity: &Identity,
        channel_id: &str,
        seek: &SeekInfo,
    ) -> Result<Envelope, ProposalError> {
        let creator = serialize_identity(identity)?;
        let tx_id = new_transaction_id(&creator, self.crypto.as_ref());

        let channel_header =
            build_channel_header(HeaderType::DeliverSeekInfo, channel_id, &tx_id, None);
        let signature_header = build_signature_header(&tx_id);

        let payload = Payload {
            header: Some(build_header(&channel_header, &signature_header)),
            data: seek.encode_to_vec(),
        }
        .encode_to_vec();
        let signature = self.crypto.sign(&payload, &identity.private_key)?;

        debug!(channel = %channel_id, tx_id = %tx_id, "Seek envelope built");

        Ok(Envelope { payload, signature })
    }
}
