//! # Domain Errors
//!
//! Error types for the status registry.

use thiserror::Error;

/// Status registry errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxStatusError {
    /// A waiter already exists for this transaction id.
    #[error("Transaction {tx_id} is already registered")]
    AlreadyRegistered {
        /// Transaction id
        tx_id: String,
    },

    /// Empty transaction id.
    #[error("txID must be provided")]
    MissingTxId,

    /// The registration was removed before a status arrived.
    #[error("Registration for transaction {tx_id} closed without a status")]
    Closed {
        /// Transaction id
        tx_id: String,
    },

    /// No status arrived within the wait deadline.
    #[error("Timed out after {timeout_ms}ms waiting for status of transaction {tx_id}")]
    Timeout {
        /// Transaction id
        tx_id: String,
        /// Wait deadline
        timeout_ms: u64,
    },

    /// A block or processed transaction could not be decoded.
    #[error("Cannot decode transaction status: {0}")]
    Decode(String),
}

impl From<prost::DecodeError> for TxStatusError {
    fn from(e: prost::DecodeError) -> Self {
        TxStatusError::Decode(e.to_string())
    }
}
