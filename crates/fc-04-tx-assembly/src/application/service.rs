//! # Transaction Assembler Service

use std::sync::Arc;

use fc_03_endorsement::PeerEndorsementResponse;
use shared_crypto::CryptoSuite;
use shared_types::protos::common::Envelope;
use shared_types::Identity;
use tracing::{debug, warn};

use crate::domain::{assemble_transaction, AssemblyError};
use crate::ports::TransactionAssemblyApi;

/// Transaction Assembler - turns endorsements into a signed envelope.
#[derive(Clone)]
pub struct TransactionAssembler {
    crypto: Arc<dyn CryptoSuite>,
}

impl TransactionAssembler {
    /// Create an assembler signing through `crypto`.
    pub fn new(crypto: Arc<dyn CryptoSuite>) -> Self {
        Self { crypto }
    }

    /// Assemble and seal in one step.
    pub fn assemble_and_seal(
        &self,
        proposal_bytes: &[u8],
        responses: &[PeerEndorsementResponse],
        identity: &Identity,
    ) -> Result<Envelope, AssemblyError> {
        let payload = self.assemble_transaction(proposal_bytes, responses)?;
        self.seal(payload, identity)
    }
}

impl TransactionAssemblyApi for TransactionAssembler {
    fn assemble_transaction(
        &self,
        proposal_bytes: &[u8],
        responses: &[PeerEndorsementResponse],
    ) -> Result<Vec<u8>, AssemblyError> {
        assemble_transaction(proposal_bytes, responses).map_err(|e| {
            warn!(error = %e, responses = responses.len(), "Transaction assembly rejected");
            e
        })
    }

    fn seal(&self, payload: Vec<u8>, identity: &Identity) -> Result<Envelope, AssemblyError> {
        let signature = self.crypto.sign(&payload, &identity.private_key)?;
        debug!(msp = %identity.msp_id, bytes = payload.len(), "Transaction envelope sealed");
        Ok(Envelope { payload, signature })
    }
}
