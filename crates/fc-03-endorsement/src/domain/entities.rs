//! # Domain Entities

use shared_types::protos::peer::ProposalResponse;
use shared_types::{MspId, TransportError};

/// How endorsements are collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndorsementMode {
    /// One response per organization of a satisfied layout.
    Quorum,
    /// One response from any reachable organization.
    Single,
}

/// Outcome of sending a proposal to one peer.
#[derive(Clone, Debug, PartialEq)]
pub struct PeerEndorsementResponse {
    /// Peer that answered.
    pub peer: String,
    /// Organization of that peer.
    pub msp_id: MspId,
    /// The peer's response, or the transport failure.
    pub result: Result<ProposalResponse, TransportError>,
}

impl PeerEndorsementResponse {
    /// Wrap a successful RPC.
    pub fn answered(peer: impl Into<String>, msp_id: impl Into<MspId>, response: ProposalResponse) -> Self {
        Self {
            peer: peer.into(),
            msp_id: msp_id.into(),
            result: Ok(response),
        }
    }

    /// Wrap a failed RPC.
    pub fn failed(peer: impl Into<String>, msp_id: impl Into<MspId>, error: TransportError) -> Self {
        Self {
            peer: peer.into(),
            msp_id: msp_id.into(),
            result: Err(error),
        }
    }

    /// The proposal response, if the RPC succeeded.
    pub fn response(&self) -> Option<&ProposalResponse> {
        self.result.as_ref().ok()
    }
}
