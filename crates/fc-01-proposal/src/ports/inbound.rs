//! # Inbound Ports
//!
//! API trait defining what the Proposal Builder can do.

use shared_types::protos::common::{ConfigUpdateEnvelope, Envelope};
use shared_types::protos::orderer::SeekInfo;
use shared_types::protos::peer::SignedProposal;
use shared_types::{ChaincodeInvocation, Identity, TransactionId};

use crate::domain::ProposalError;

/// Proposal Builder API - inbound port.
pub trait ProposalApi: Send + Sync {
    /// Build and sign an endorser-transaction proposal.
    ///
    /// Every call draws a fresh nonce, so two calls with the same inputs
    /// yield different transaction ids.
    fn build_proposal(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<(SignedProposal, TransactionId), ProposalError>;

    /// Build and sign a proposal addressed to a peer rather than a channel,
    /// as used by peer-scoped system chaincodes (install, join, channel
    /// listing).
    fn build_peer_proposal(
        &self,
        identity: &Identity,
        chaincode: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<(SignedProposal, TransactionId), ProposalError>;

    /// Add this identity's approval to `update` and wrap it in a signed
    /// CONFIG_UPDATE envelope for `channel_id`.
    fn build_config_update_envelope(
        &self,
        identity: &Identity,
        channel_id: &str,
        update: ConfigUpdateEnvelope,
    ) -> Result<Envelope, ProposalError>;

    /// Build a signed deliver-seek envelope for `channel_id`.
    fn build_seek_envelope(
        &self,
        identity: &Identity,
        channel_id: &str,
        seek: &SeekInfo,
    ) -> Result<Envelope, ProposalError>;
}
