//! # Endorsement Group Table
//!
//! Channel + chaincode -> layouts. Owned by a client instance and shared with
//! the orchestrator through an `Arc`.
//!
//! Entries are immutable snapshots: a refresh swaps in a new `Arc<[_]>`
//! under the write lock, and readers keep whatever snapshot they cloned.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::EndorsementLayout;

type ChaincodeLayouts = HashMap<String, Arc<[EndorsementLayout]>>;

/// Concurrent, copy-on-write endorsement layout table.
#[derive(Debug, Default)]
pub struct EndorsementGroupTable {
    channels: RwLock<HashMap<String, ChaincodeLayouts>>,
}

impl EndorsementGroupTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the layouts for a channel/chaincode pair.
    pub fn layouts(&self, channel: &str, chaincode: &str) -> Option<Arc<[EndorsementLayout]>> {
        self.channels
            .read()
            .get(channel)
            .and_then(|chaincodes| chaincodes.get(chaincode))
            .cloned()
    }

    /// Replace the entry for one channel/chaincode pair.
    pub fn replace(&self, channel: &str, chaincode: &str, layouts: Vec<EndorsementLayout>) {
        self.channels
            .write()
            .entry(channel.to_string())
            .or_default()
            .insert(chaincode.to_string(), layouts.into());
    }

    /// Replace several chaincode entries of one channel under a single lock.
    pub fn replace_all(&self, channel: &str, entries: Vec<(String, Vec<EndorsementLayout>)>) {
        let mut channels = self.channels.write();
        let chaincodes = channels.entry(channel.to_string()).or_default();
        for (chaincode, layouts) in entries {
            chaincodes.insert(chaincode, layouts.into());
        }
    }

    /// Drop every entry of a channel.
    pub fn remove_channel(&self, channel: &str) -> bool {
        self.channels.write().remove(channel).is_some()
    }

    /// Number of channel/chaincode entries.
    pub fn len(&self) -> usize {
        self.channels.read().values().map(HashMap::len).sum()
    }

    /// True if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
