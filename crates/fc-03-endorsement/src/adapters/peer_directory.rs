//! In-memory peer pools, filled by the connection layer after it dials the
//! endpoints a discovery refresh returned.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::ports::{EndorserConnection, PeerDirectory};

type OrgPools = HashMap<String, Vec<Arc<dyn EndorserConnection>>>;

/// Channel -> organization -> connections.
#[derive(Default)]
pub struct InMemoryPeerDirectory {
    pools: RwLock<HashMap<String, OrgPools>>,
}

impl InMemoryPeerDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a connection to its organization's pool on `channel`.
    pub fn add_peer(&self, channel: &str, peer: Arc<dyn EndorserConnection>) {
        debug!(channel = %channel, peer = %peer.name(), msp = %peer.msp_id(), "Peer added to pool");
        self.pools
            .write()
            .entry(channel.to_string())
            .or_default()
            .entry(peer.msp_id().to_string())
            .or_default()
            .push(peer);
    }

    /// Replace every pool of `channel`.
    pub fn replace_channel(&self, channel: &str, peers: Vec<Arc<dyn EndorserConnection>>) {
        let mut pools: OrgPools = HashMap::new();
        for peer in peers {
            pools.entry(peer.msp_id().to_string()).or_default().push(peer);
        }
        self.pools.write().insert(channel.to_string(), pools);
    }

    /// Number of connections registered on `channel`.
    pub fn peer_count(&self, channel: &str) -> usize {
        self.pools
            .read()
            .get(channel)
            .map(|orgs| orgs.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

impl PeerDirectory for InMemoryPeerDirectory {
    fn peers(&self, channel: &str, msp_id: &str) -> Vec<Arc<dyn EndorserConnection>> {
        self.pools
            .read()
            .get(channel)
            .and_then(|orgs| orgs.get(msp_id))
            .cloned()
            .unwrap_or_default()
    }

    fn channel_peers(&self, channel: &str) -> Vec<Arc<dyn EndorserConnection>> {
        let pools = self.pools.read();
        let Some(orgs) = pools.get(channel) else {
            return Vec::new();
        };
        let mut msp_ids: Vec<&String> = orgs.keys().collect();
        msp_ids.sort();
        msp_ids
            .into_iter()
            .flat_map(|msp_id| orgs[msp_id].iter().cloned())
            .collect()
    }
}
