//! # Endorsement Group Resolver Service
//!
//! Pulls descriptors from discovery, resolves them into layouts and swaps
//! them into the table. Resolution and commit are separate steps so a caller
//! can stage a refresh and drop it on a later failure.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::{
    orderer_endpoints, parse_interests, resolve_layouts, ChannelPeer, DiscoveryError,
    EndorsementGroupTable, EndorsementLayout, OrdererEndpoint, PeerEndpoint, ResolvedChannel,
};
use crate::ports::{DiscoveryClient, EndorsementGroupApi};

/// Endorsement Group Resolver - keeps the group table in sync with discovery.
pub struct EndorsementGroupResolver {
    discovery: Arc<dyn DiscoveryClient>,
    table: Arc<EndorsementGroupTable>,
}

impl EndorsementGroupResolver {
    /// Create a resolver that writes into `table`.
    pub fn new(discovery: Arc<dyn DiscoveryClient>, table: Arc<EndorsementGroupTable>) -> Self {
        Self { discovery, table }
    }

    /// The table this resolver maintains.
    pub fn table(&self) -> &Arc<EndorsementGroupTable> {
        &self.table
    }
}

#[async_trait]
impl EndorsementGroupApi for EndorsementGroupResolver {
    async fn refresh(
        &self,
        channel: &str,
        chaincodes: &[String],
        collections: &BTreeMap<String, String>,
    ) -> Result<ResolvedChannel, DiscoveryError> {
        let resolved = self.resolve(channel, chaincodes, collections).await?;
        self.commit(&resolved);
        Ok(resolved)
    }

    async fn resolve(
        &self,
        channel: &str,
        chaincodes: &[String],
        collections: &BTreeMap<String, String>,
    ) -> Result<ResolvedChannel, DiscoveryError> {
        let interests = parse_interests(chaincodes, collections)?;
        let config = self.discovery.channel_config(channel).await?;
        let descriptors = self
            .discovery
            .endorsement_descriptors(channel, &interests)
            .await?;

        let mut peers: BTreeMap<String, Vec<PeerEndpoint>> = BTreeMap::new();
        let mut staged: BTreeMap<String, Vec<EndorsementLayout>> = BTreeMap::new();

        for descriptor in &descriptors {
            for (group, endorsers) in &descriptor.endorsers_by_group {
                debug!(channel = %channel, group = %group, peers = endorsers.len(), "Discovered group");
                for endorser in endorsers {
                    let known = peers.entry(endorser.msp_id.clone()).or_default();
                    if known.iter().any(|p| p.address == endorser.endpoint) {
                        continue;
                    }
                    known.push(PeerEndpoint {
                        channel_id: channel.to_string(),
                        msp_id: endorser.msp_id.clone(),
                        address: endorser.endpoint.clone(),
                        tls_root_certs: config.tls_roots(&endorser.msp_id),
                    });
                }
            }
            staged.insert(
                descriptor.chaincode.clone(),
                resolve_layouts(channel, descriptor)?,
            );
        }

        if peers.is_empty() {
            warn!(channel = %channel, "Discovery returned no endorsing peers");
            return Err(DiscoveryError::NoPeers {
                channel: channel.to_string(),
            });
        }

        if let Some(missing) = chaincodes.iter().find(|cc| !staged.contains_key(*cc)) {
            return Err(DiscoveryError::NoLayouts {
                channel: channel.to_string(),
                chaincode: missing.clone(),
            });
        }

        debug!(
            channel = %channel,
            chaincodes = staged.len(),
            orgs = peers.len(),
            "Endorsement groups resolved"
        );

        Ok(ResolvedChannel {
            channel_id: channel.to_string(),
            peers,
            layouts: staged,
        })
    }

    fn commit(&self, resolved: &ResolvedChannel) {
        let entries = resolved
            .layouts
            .iter()
            .map(|(chaincode, layouts)| (chaincode.clone(), layouts.clone()))
            .collect();
        self.table.replace_all(&resolved.channel_id, entries);
        info!(
            channel = %resolved.channel_id,
            chaincodes = resolved.layouts.len(),
            orgs = resolved.peers.len(),
            "Endorsement groups refreshed"
        );
    }

    fn layouts(&self, channel: &str, chaincode: &str) -> Option<Arc<[EndorsementLayout]>> {
        self.table.layouts(channel, chaincode)
    }

    async fn orderer_endpoints(&self, channel: &str) -> Result<Vec<OrdererEndpoint>, DiscoveryError> {
        let config = self.discovery.channel_config(channel).await?;
        let endpoints = orderer_endpoints(channel, &config)?;
        debug!(channel = %channel, orderers = endpoints.len(), "Orderers from channel config");
        Ok(endpoints)
    }

    async fn channel_peers(&self, channel: &str) -> Result<Vec<ChannelPeer>, DiscoveryError> {
        let mut peers = self.discovery.channel_peers(channel).await?;
        if peers.is_empty() {
            return Err(DiscoveryError::NoPeers {
                channel: channel.to_string(),
            });
        }
        peers.sort_by(|a, b| b.ledger_height.cmp(&a.ledger_height));
        Ok(peers)
    }
}
