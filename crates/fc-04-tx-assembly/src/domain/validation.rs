//! Endorsement consistency checks.

use fc_03_endorsement::PeerEndorsementResponse;
use shared_types::protos::peer::Endorsement;
use tracing::debug;

use super::AssemblyError;

/// Chaincode status a response must carry to be counted.
pub const STATUS_SUCCESS: i32 = 200;

/// Endorsements that passed validation, with the payload they all signed.
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedEndorsements {
    /// Shared simulation result.
    pub proposal_response_payload: Vec<u8>,
    /// One endorsement per accepted response, in response order.
    pub endorsements: Vec<Endorsement>,
}

/// Validate `responses` and extract their endorsements.
///
/// Responses are checked in order; the first failing response decides the
/// error.
pub fn validate_responses(
    responses: &[PeerEndorsementResponse],
) -> Result<AcceptedEndorsements, AssemblyError> {
    let mut payload: Option<&[u8]> = None;
    let mut endorsements = Vec::with_capacity(responses.len());

    for response in responses {
        let proposal_response = match &response.result {
            Ok(r) => r,
            Err(e) => {
                return Err(AssemblyError::Endorsement {
                    peer: response.peer.clone(),
                    source: e.clone(),
                })
            }
        };

        if proposal_response.status() != STATUS_SUCCESS {
            return Err(AssemblyError::BadTransactionStatus {
                peer: response.peer.clone(),
                status: proposal_response.status(),
                message: proposal_response.message().to_string(),
            });
        }

        match payload {
            None => payload = Some(&proposal_response.payload),
            Some(first) if first != proposal_response.payload.as_slice() => {
                return Err(AssemblyError::EndorsementsDoNotMatch {
                    peer: response.peer.clone(),
                });
            }
            Some(_) => {}
        }

        let endorsement = proposal_response.endorsement.clone().ok_or_else(|| {
            AssemblyError::MissingEndorsement {
                peer: response.peer.clone(),
            }
        })?;
        endorsements.push(endorsement);
    }

    let proposal_response_payload = payload
        .ok_or(AssemblyError::NoValidEndorsementFound)?
        .to_vec();
    debug!(endorsements = endorsements.len(), "Endorsements validated");

    Ok(AcceptedEndorsements {
        proposal_response_payload,
        endorsements,
    })
}
