//! # Inbound Ports
//!
//! API trait defining what the Endorsement Group Resolver can do.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    ChannelPeer, DiscoveryError, EndorsementLayout, OrdererEndpoint, ResolvedChannel,
};

/// Endorsement Group Resolver API - inbound port.
#[async_trait]
pub trait EndorsementGroupApi: Send + Sync {
    /// Rediscover the endorsement policies of `chaincodes` on `channel` and
    /// replace their table entries.
    ///
    /// `collections` maps a chaincode to a comma-separated collection list.
    async fn refresh(
        &self,
        channel: &str,
        chaincodes: &[String],
        collections: &BTreeMap<String, String>,
    ) -> Result<ResolvedChannel, DiscoveryError>;

    /// Resolve like [`refresh`](Self::refresh) without touching the table.
    async fn resolve(
        &self,
        channel: &str,
        chaincodes: &[String],
        collections: &BTreeMap<String, String>,
    ) -> Result<ResolvedChannel, DiscoveryError>;

    /// Replace the channel's table entries with a resolved result.
    fn commit(&self, resolved: &ResolvedChannel);

    /// Current layouts for a channel/chaincode pair.
    fn layouts(&self, channel: &str, chaincode: &str) -> Option<Arc<[EndorsementLayout]>>;

    /// Orderers advertised by the channel config, in failover order.
    async fn orderer_endpoints(&self, channel: &str) -> Result<Vec<OrdererEndpoint>, DiscoveryError>;

    /// Peers joined to the channel, highest ledger first.
    async fn channel_peers(&self, channel: &str) -> Result<Vec<ChannelPeer>, DiscoveryError>;
}
