//! # Inbound Ports
//!
//! API trait defining what the Endorsement Orchestrator can do.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::protos::peer::SignedProposal;

use super::EndorserConnection;
use crate::domain::{EndorsementError, EndorsementMode, PeerEndorsementResponse};

/// Endorsement Orchestrator API - inbound port.
#[async_trait]
pub trait EndorsementApi: Send + Sync {
    /// Collect endorsements for `proposal` according to the layouts of
    /// `chaincode` on `channel`.
    async fn collect_endorsements(
        &self,
        proposal: &SignedProposal,
        channel: &str,
        chaincode: &str,
        mode: EndorsementMode,
    ) -> Result<Vec<PeerEndorsementResponse>, EndorsementError>;

    /// Send `proposal` to every listed peer concurrently.
    ///
    /// Returns one entry per peer in input order; unready peers and transport
    /// failures appear as `Err` results.
    async fn endorse_all(
        &self,
        proposal: &SignedProposal,
        peers: &[Arc<dyn EndorserConnection>],
    ) -> Vec<PeerEndorsementResponse>;
}
