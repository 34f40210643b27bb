//! # Outbound Ports
//!
//! The discovery wire client the resolver depends on.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{
    ChaincodeInterest, ChannelConfig, ChannelPeer, DiscoveryError, EndorsementDescriptor,
};

/// Discovery service client - outbound port.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Endorsement descriptors for the given chaincodes on `channel`.
    async fn endorsement_descriptors(
        &self,
        channel: &str,
        interests: &[ChaincodeInterest],
    ) -> Result<Vec<EndorsementDescriptor>, DiscoveryError>;

    /// Channel configuration (MSP TLS roots, orderer endpoints).
    async fn channel_config(&self, channel: &str) -> Result<ChannelConfig, DiscoveryError>;

    /// Peers joined to `channel`.
    async fn channel_peers(&self, channel: &str) -> Result<Vec<ChannelPeer>, DiscoveryError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock discovery client for testing.
///
/// Answers from per-channel canned data; a channel with no data yields an
/// empty answer rather than an error.
#[derive(Default)]
pub struct MockDiscoveryClient {
    descriptors: RwLock<HashMap<String, Vec<EndorsementDescriptor>>>,
    configs: RwLock<HashMap<String, ChannelConfig>>,
    peers: RwLock<HashMap<String, Vec<ChannelPeer>>>,
    /// Should every call fail?
    pub should_fail: bool,
}

impl MockDiscoveryClient {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose calls always fail.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Set the descriptors returned for `channel`.
    pub fn set_descriptors(&self, channel: &str, descriptors: Vec<EndorsementDescriptor>) {
        self.descriptors.write().insert(channel.to_string(), descriptors);
    }

    /// Set the channel config returned for `channel`.
    pub fn set_config(&self, channel: &str, config: ChannelConfig) {
        self.configs.write().insert(channel.to_string(), config);
    }

    /// Set the peers returned for `channel`.
    pub fn set_peers(&self, channel: &str, peers: Vec<ChannelPeer>) {
        self.peers.write().insert(channel.to_string(), peers);
    }

    fn check(&self) -> Result<(), DiscoveryError> {
        if self.should_fail {
            return Err(DiscoveryError::Transport("Mock failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DiscoveryClient for MockDiscoveryClient {
    async fn endorsement_descriptors(
        &self,
        channel: &str,
        interests: &[ChaincodeInterest],
    ) -> Result<Vec<EndorsementDescriptor>, DiscoveryError> {
        self.check()?;
        Ok(self
            .descriptors
            .read()
            .get(channel)
            .map(|all| {
                all.iter()
                    .filter(|d| interests.iter().any(|i| i.chaincode == d.chaincode))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn channel_config(&self, channel: &str) -> Result<ChannelConfig, DiscoveryError> {
        self.check()?;
        Ok(self.configs.read().get(channel).cloned().unwrap_or_default())
    }

    async fn channel_peers(&self, channel: &str) -> Result<Vec<ChannelPeer>, DiscoveryError> {
        self.check()?;
        Ok(self.peers.read().get(channel).cloned().unwrap_or_default())
    }
}
