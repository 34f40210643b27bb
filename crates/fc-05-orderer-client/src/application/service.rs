//! # Orderer Client Service
//!
//! Per-channel orderer lists with in-order failover.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fc_01_proposal::ProposalApi;
use fc_02_endorsement_groups::OrdererEndpoint;
use parking_lot::RwLock;
use shared_types::protos::common::{Block, Envelope, Status};
use shared_types::protos::orderer::{BroadcastResponse, SeekInfo};
use shared_types::{Identity, TransportError};
use tracing::{debug, info, warn};

use crate::config::OrdererClientConfig;
use crate::domain::{BlockCollector, DeliverStep, OrdererError};
use crate::ports::{OrdererApi, OrdererConnection, OrdererConnector};

/// Orderer Client - broadcast and deliver against a channel's orderers.
pub struct OrdererClient {
    config: OrdererClientConfig,
    envelopes: Arc<dyn ProposalApi>,
    orderers: RwLock<HashMap<String, Vec<Arc<dyn OrdererConnection>>>>,
}

impl OrdererClient {
    /// Create a client; `envelopes` signs the seek requests used by deliver.
    pub fn new(config: OrdererClientConfig, envelopes: Arc<dyn ProposalApi>) -> Self {
        Self {
            config,
            envelopes,
            orderers: RwLock::new(HashMap::new()),
        }
    }

    /// Set the ordered orderer list of `channel`.
    pub fn register_orderers(&self, channel: &str, orderers: Vec<Arc<dyn OrdererConnection>>) {
        info!(channel = %channel, orderers = orderers.len(), "Orderers registered");
        self.orderers.write().insert(channel.to_string(), orderers);
    }

    /// Dial `endpoints` through `connector`, keeping endpoint order and
    /// skipping the ones that cannot be reached. Nothing is registered.
    pub fn dial_endpoints(
        &self,
        channel: &str,
        endpoints: &[OrdererEndpoint],
        connector: &dyn OrdererConnector,
    ) -> Vec<Arc<dyn OrdererConnection>> {
        endpoints
            .iter()
            .filter_map(|endpoint| match connector.connect(endpoint) {
                Ok(connection) => Some(connection),
                Err(e) => {
                    warn!(channel = %channel, orderer = %endpoint.name, address = %endpoint.address, error = %e, "Could not connect to orderer");
                    None
                }
            })
            .collect()
    }

    /// Dial `endpoints` and register the connections that could be
    /// established.
    pub fn connect_endpoints(
        &self,
        channel: &str,
        endpoints: &[OrdererEndpoint],
        connector: &dyn OrdererConnector,
    ) -> usize {
        let connections = self.dial_endpoints(channel, endpoints, connector);
        let connected = connections.len();
        self.register_orderers(channel, connections);
        connected
    }

    /// Orderers of `channel`, in failover order.
    pub fn orderers(&self, channel: &str) -> Vec<Arc<dyn OrdererConnection>> {
        self.orderers.read().get(channel).cloned().unwrap_or_default()
    }

    fn configured(&self, channel: &str) -> Result<Vec<Arc<dyn OrdererConnection>>, OrdererError> {
        let orderers = self.orderers(channel);
        if orderers.is_empty() {
            return Err(OrdererError::ChannelNotConfigured {
                channel: channel.to_string(),
            });
        }
        Ok(orderers)
    }

    /// One broadcast attempt against a single orderer.
    pub async fn broadcast_to(
        &self,
        orderer: &dyn OrdererConnection,
        envelope: &Envelope,
    ) -> Result<BroadcastResponse, OrdererError> {
        let name = orderer.name();
        let transport = |source: TransportError| OrdererError::Transport {
            orderer: name.to_string(),
            source,
        };

        if !orderer.is_ready() {
            return Err(transport(TransportError::NotReady(name.to_string())));
        }

        let mut stream = orderer.open_broadcast().await.map_err(transport)?;
        stream.send(envelope).await.map_err(transport)?;
        let response = stream
            .recv()
            .await
            .map_err(transport)?
            .ok_or_else(|| OrdererError::StreamClosed {
                orderer: name.to_string(),
            })?;
        if let Err(e) = stream.close_send().await {
            debug!(orderer = %name, error = %e, "Close-send on broadcast stream failed");
        }

        if response.status != Status::Success as i32 {
            return Err(OrdererError::BadStatus {
                orderer: name.to_string(),
                status: response.status,
                info: response.info,
            });
        }
        Ok(response)
    }

    /// One deliver exchange against a single orderer, bounded by the
    /// configured deadline.
    pub async fn deliver_from(
        &self,
        orderer: &dyn OrdererConnection,
        seek_envelope: &Envelope,
    ) -> Result<Block, OrdererError> {
        tokio::time::timeout(
            self.config.deliver_timeout(),
            read_block(orderer, seek_envelope),
        )
        .await
        .map_err(|_| OrdererError::Timeout {
            orderer: orderer.name().to_string(),
            timeout_secs: self.config.deliver_timeout_secs,
        })?
    }
}

async fn read_block(
    orderer: &dyn OrdererConnection,
    seek_envelope: &Envelope,
) -> Result<Block, OrdererError> {
    let name = orderer.name();
    let transport = |source: TransportError| OrdererError::Transport {
        orderer: name.to_string(),
        source,
    };

    let mut stream = orderer.open_deliver().await.map_err(transport)?;
    stream.send(seek_envelope).await.map_err(transport)?;

    let mut collector = BlockCollector::new(name);
    while let Some(response) = stream.recv().await.map_err(transport)? {
        if let DeliverStep::Done(block) = collector.accept(response)? {
            return Ok(block);
        }
    }
    Err(collector.closed())
}

#[async_trait]
impl OrdererApi for OrdererClient {
    async fn broadcast(
        &self,
        channel: &str,
        envelope: &Envelope,
    ) -> Result<BroadcastResponse, OrdererError> {
        let orderers = self.configured(channel)?;
        let mut failures = Vec::with_capacity(orderers.len());

        for orderer in &orderers {
            match self.broadcast_to(orderer.as_ref(), envelope).await {
                Ok(response) => {
                    info!(channel = %channel, orderer = %orderer.name(), attempts = failures.len() + 1, "Envelope accepted by orderer");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(channel = %channel, orderer = %orderer.name(), error = %e, "Broadcast failed, trying next orderer");
                    failures.push(e);
                }
            }
        }

        Err(OrdererError::AllOrderersFailed {
            channel: channel.to_string(),
            failures,
        })
    }

    async fn fetch_block(
        &self,
        channel: &str,
        identity: &Identity,
        number: u64,
    ) -> Result<Block, OrdererError> {
        let orderers = self.configured(channel)?;
        let seek = self
            .envelopes
            .build_seek_envelope(identity, channel, &SeekInfo::range(number, number))?;
        let mut failures = Vec::with_capacity(orderers.len());

        for orderer in &orderers {
            match self.deliver_from(orderer.as_ref(), &seek).await {
                Ok(block) => {
                    debug!(channel = %channel, orderer = %orderer.name(), block = block.number(), "Block delivered");
                    return Ok(block);
                }
                Err(e) => {
                    warn!(channel = %channel, orderer = %orderer.name(), block = number, error = %e, "Deliver failed, trying next orderer");
                    failures.push(e);
                }
            }
        }

        // Only deadline expiries: report the timeout itself.
        if failures.iter().all(OrdererError::is_timeout) {
            if let Some(timeout) = failures.pop() {
                return Err(timeout);
            }
        }
        Err(OrdererError::AllOrderersFailed {
            channel: channel.to_string(),
            failures,
        })
    }

    fn is_ready(&self, channel: &str) -> bool {
        self.orderers
            .read()
            .get(channel)
            .map(|orderers| orderers.iter().any(|o| o.is_ready()))
            .unwrap_or(false)
    }
}
