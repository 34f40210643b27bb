//! Transaction payload assembly.

use prost::Message;
use shared_types::protos::common::{Header, Payload};
use shared_types::protos::peer::{
    ChaincodeActionPayload, ChaincodeEndorsedAction, ChaincodeProposalPayload, Proposal,
    Transaction, TransactionAction,
};
use tracing::debug;

use fc_03_endorsement::PeerEndorsementResponse;

use super::{validate_responses, AssemblyError};

/// Build the marshaled transaction payload for `proposal_bytes` from the
/// collected `responses`.
///
/// The result is the unsigned `Payload`; sealing it into an envelope is the
/// caller's step. Identical inputs always produce identical bytes.
pub fn assemble_transaction(
    proposal_bytes: &[u8],
    responses: &[PeerEndorsementResponse],
) -> Result<Vec<u8>, AssemblyError> {
    let accepted = validate_responses(responses)?;

    let proposal = Proposal::decode(proposal_bytes)?;
    let header = Header::decode(proposal.header.as_slice())?;
    let mut chaincode_payload = ChaincodeProposalPayload::decode(proposal.payload.as_slice())?;
    // Transient data is for endorsers only.
    chaincode_payload.transient_map.clear();

    let action_payload = ChaincodeActionPayload {
        chaincode_proposal_payload: chaincode_payload.encode_to_vec(),
        action: Some(ChaincodeEndorsedAction {
            proposal_response_payload: accepted.proposal_response_payload,
            endorsements: accepted.endorsements,
        }),
    };

    let transaction = Transaction {
        actions: vec![TransactionAction {
            header: header.signature_header.clone(),
            payload: action_payload.encode_to_vec(),
        }],
    };

    let payload = Payload {
        header: Some(header),
        data: transaction.encode_to_vec(),
    };

    debug!(endorsements = responses.len(), "Transaction payload assembled");
    Ok(payload.encode_to_vec())
}
