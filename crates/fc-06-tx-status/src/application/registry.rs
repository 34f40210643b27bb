//! # Transaction Status Registry
//!
//! A map from transaction id to a single-assignment sender, guarded by one
//! lock. Each registration carries a generation so that a stale waiter can
//! never remove a newer registration of the same id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::domain::{TxStatusError, TxStatusEvent};
use crate::ports::TxStatusApi;

lazy_static! {
    static ref GLOBAL_REGISTRY: TxStatusRegistry = TxStatusRegistry::new();
}

struct Entry {
    generation: u64,
    sender: oneshot::Sender<TxStatusEvent>,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<String, Entry>>,
    next_generation: AtomicU64,
}

impl Inner {
    fn remove_if_current(&self, tx_id: &str, generation: u64) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(tx_id) {
            Some(entry) if entry.generation == generation => {
                entries.remove(tx_id);
                true
            }
            _ => false,
        }
    }
}

/// Transaction Status Registry. Clones share the same entries.
#[derive(Clone, Default)]
pub struct TxStatusRegistry {
    inner: Arc<Inner>,
}

impl TxStatusRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static TxStatusRegistry {
        &GLOBAL_REGISTRY
    }
}

impl TxStatusApi for TxStatusRegistry {
    fn register(&self, tx_id: &str) -> Result<TxStatusWaiter, TxStatusError> {
        if tx_id.is_empty() {
            return Err(TxStatusError::MissingTxId);
        }

        let mut entries = self.inner.entries.lock();
        if entries.contains_key(tx_id) {
            return Err(TxStatusError::AlreadyRegistered {
                tx_id: tx_id.to_string(),
            });
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        entries.insert(tx_id.to_string(), Entry { generation, sender });
        debug!(tx_id = %tx_id, pending = entries.len(), "Transaction registered");

        Ok(TxStatusWaiter {
            tx_id: tx_id.to_string(),
            generation,
            receiver,
            registry: Arc::clone(&self.inner),
        })
    }

    fn unregister(&self, tx_id: &str) {
        // Dropping the sender closes the waiter's receiver.
        if self.inner.entries.lock().remove(tx_id).is_some() {
            debug!(tx_id = %tx_id, "Transaction unregistered");
        }
    }

    fn publish(&self, event: TxStatusEvent) {
        let entry = self.inner.entries.lock().remove(&event.tx_id);
        match entry {
            Some(entry) => {
                let tx_id = event.tx_id.clone();
                if entry.sender.send(event).is_err() {
                    trace!(tx_id = %tx_id, "Waiter gone before status arrived");
                } else {
                    debug!(tx_id = %tx_id, "Transaction status delivered");
                }
            }
            None => trace!(tx_id = %event.tx_id, "No waiter for published status"),
        }
    }

    fn pending(&self) -> usize {
        self.inner.entries.lock().len()
    }
}

/// Receiving side of one registration. Dropping it unregisters.
pub struct TxStatusWaiter {
    tx_id: String,
    generation: u64,
    receiver: oneshot::Receiver<TxStatusEvent>,
    registry: Arc<Inner>,
}

impl TxStatusWaiter {
    /// Transaction id this waiter is registered for.
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Wait until the status is published or the registration is removed.
    pub async fn wait(mut self) -> Result<TxStatusEvent, TxStatusError> {
        (&mut self.receiver).await.map_err(|_| TxStatusError::Closed {
            tx_id: self.tx_id.clone(),
        })
    }

    /// Like [`wait`](Self::wait), bounded by `timeout`.
    pub async fn wait_timeout(mut self, timeout: Duration) -> Result<TxStatusEvent, TxStatusError> {
        match tokio::time::timeout(timeout, &mut self.receiver).await {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(_)) => Err(TxStatusError::Closed {
                tx_id: self.tx_id.clone(),
            }),
            Err(_) => Err(TxStatusError::Timeout {
                tx_id: self.tx_id.clone(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

impl Drop for TxStatusWaiter {
    fn drop(&mut self) {
        if self.registry.remove_if_current(&self.tx_id, self.generation) {
            trace!(tx_id = %self.tx_id, "Waiter dropped, registration removed");
        }
    }
}

impl std::fmt::Debug for TxStatusWaiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxStatusWaiter")
            .field("tx_id", &self.tx_id)
            .field("generation", &self.generation)
            .finish()
    }
}
