//! # Status Events
//!
//! What the block-event source publishes, and how it is read off committed
//! blocks.

use prost::Message;
use shared_types::protos::common::{Block, ChannelHeader, Envelope, Payload};
use shared_types::protos::peer::{ProcessedTransaction, TxValidationCode};

use super::TxStatusError;

/// Position of the per-transaction validation codes in block metadata.
pub const TRANSACTIONS_FILTER_INDEX: usize = 2;

/// Commit status of one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxStatusEvent {
    /// Transaction id.
    pub tx_id: String,
    /// Validation outcome assigned by the committing peer.
    pub validation_code: TxValidationCode,
    /// Block that carries the transaction.
    pub block_number: u64,
}

impl TxStatusEvent {
    /// Create an event.
    pub fn new(tx_id: impl Into<String>, validation_code: TxValidationCode, block_number: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            validation_code,
            block_number,
        }
    }

    /// True if the transaction committed as valid.
    pub fn is_valid(&self) -> bool {
        self.validation_code == TxValidationCode::Valid
    }
}

/// Validation code of a marshaled `ProcessedTransaction` returned by a
/// ledger query.
pub fn decode_processed_transaction(bytes: &[u8]) -> Result<TxValidationCode, TxStatusError> {
    let processed = ProcessedTransaction::decode(bytes)?;
    TxValidationCode::try_from(processed.validation_code)
        .map_err(|_| TxStatusError::Decode(format!("unknown validation code {}", processed.validation_code)))
}

/// One event per transaction in `block`, in block order.
///
/// Transactions without a filter entry are reported as `NotValidated`.
pub fn events_from_block(block: &Block) -> Result<Vec<TxStatusEvent>, TxStatusError> {
    let number = block.number();
    let filter: &[u8] = block
        .metadata
        .as_ref()
        .and_then(|m| m.metadata.get(TRANSACTIONS_FILTER_INDEX))
        .map(Vec::as_slice)
        .unwrap_or_default();
    let transactions = block.data.as_ref().map(|d| d.data.as_slice()).unwrap_or_default();

    let mut events = Vec::with_capacity(transactions.len());
    for (index, envelope_bytes) in transactions.iter().enumerate() {
        let envelope = Envelope::decode(envelope_bytes.as_slice())?;
        let payload = Payload::decode(envelope.payload.as_slice())?;
        let header = payload
            .header
            .ok_or_else(|| TxStatusError::Decode(format!("transaction {} in block {} has no header", index, number)))?;
        let channel_header = ChannelHeader::decode(header.channel_header.as_slice())?;

        let validation_code = filter
            .get(index)
            .and_then(|code| TxValidationCode::try_from(i32::from(*code)).ok())
            .unwrap_or(TxValidationCode::NotValidated);
        events.push(TxStatusEvent::new(channel_header.tx_id, validation_code, number));
    }
    Ok(events)
}
