//! # Inbound Ports
//!
//! API trait defining what the Transaction Assembler can do.

use fc_03_endorsement::PeerEndorsementResponse;
use shared_types::protos::common::Envelope;
use shared_types::Identity;

use crate::domain::AssemblyError;

/// Transaction Assembler API - inbound port.
pub trait TransactionAssemblyApi: Send + Sync {
    /// Validate `responses` and build the marshaled transaction payload for
    /// the proposal they endorse.
    fn assemble_transaction(
        &self,
        proposal_bytes: &[u8],
        responses: &[PeerEndorsementResponse],
    ) -> Result<Vec<u8>, AssemblyError>;

    /// Sign `payload` on behalf of `identity`.
    fn seal(&self, payload: Vec<u8>, identity: &Identity) -> Result<Envelope, AssemblyError>;
}
