//! # Inbound Ports
//!
//! API trait defining what the Transaction Status Registry can do.

use crate::application::TxStatusWaiter;
use crate::domain::{TxStatusError, TxStatusEvent};

/// Transaction Status Registry API - inbound port.
///
/// `register`/`unregister` are called by submitters; `publish` by the
/// block-event source.
pub trait TxStatusApi: Send + Sync {
    /// Create the single waiter for `tx_id`.
    fn register(&self, tx_id: &str) -> Result<TxStatusWaiter, TxStatusError>;

    /// Drop the registration for `tx_id`. No-op if there is none.
    fn unregister(&self, tx_id: &str);

    /// Deliver `event` to its waiter, if one is registered. Never blocks.
    fn publish(&self, event: TxStatusEvent);

    /// Number of outstanding registrations.
    fn pending(&self) -> usize;
}
