//! # Inbound Ports
//!
//! API trait defining what the Orderer Client can do.

use async_trait::async_trait;
use shared_types::protos::common::{Block, Envelope};
use shared_types::protos::orderer::BroadcastResponse;
use shared_types::Identity;

use crate::domain::OrdererError;

/// Orderer Client API - inbound port.
#[async_trait]
pub trait OrdererApi: Send + Sync {
    /// Submit `envelope` to the first orderer of `channel` that accepts it.
    async fn broadcast(
        &self,
        channel: &str,
        envelope: &Envelope,
    ) -> Result<BroadcastResponse, OrdererError>;

    /// Read block `number` of `channel`, failing over across orderers.
    async fn fetch_block(
        &self,
        channel: &str,
        identity: &Identity,
        number: u64,
    ) -> Result<Block, OrdererError>;

    /// Read block 0 of `channel`.
    async fn fetch_genesis_block(
        &self,
        channel: &str,
        identity: &Identity,
    ) -> Result<Block, OrdererError> {
        self.fetch_block(channel, identity, 0).await
    }

    /// True if any orderer of `channel` has a ready transport.
    fn is_ready(&self, channel: &str) -> bool;
}
