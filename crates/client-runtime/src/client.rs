//! # Fabric Client
//!
//! Wires the components into the operations an application calls.
//!
//! ## Invoke Flow
//!
//! ```text
//! build_proposal ──► collect_endorsements (quorum) ──► assemble + seal ──► broadcast
//!        │                                                                   │
//!        └── register tx id (invoke_and_wait) ◄──── publish ◄── committed block
//! ```

use std::sync::Arc;

use fc_01_proposal::{ProposalApi, ProposalBuilder};
use fc_02_endorsement_groups::{
    DiscoveryClient, EndorsementGroupApi, EndorsementGroupResolver, EndorsementGroupTable,
    ResolvedChannel,
};
use fc_03_endorsement::{
    EndorsementApi, EndorsementError, EndorsementMode, EndorsementOrchestrator,
    EndorserConnection, InMemoryPeerDirectory, PeerConnector, PeerDirectory,
    PeerEndorsementResponse,
};
use fc_04_tx_assembly::TransactionAssembler;
use fc_05_orderer_client::{OrdererApi, OrdererClient, OrdererConnector, OrdererError};
use fc_06_tx_status::{
    decode_processed_transaction, events_from_block, TxStatusApi, TxStatusEvent, TxStatusRegistry,
};
use prost::Message;
use shared_crypto::CryptoSuite;
use shared_types::protos::common::{Block, BlockchainInfo, Status};
use shared_types::protos::orderer::BroadcastResponse;
use shared_types::protos::peer::{ProposalResponse, SignedProposal, TxValidationCode};
use shared_types::{ChaincodeInvocation, Identity, TransactionId};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::errors::ClientError;

/// Query system chaincode.
pub const QSCC: &str = "qscc";

pub(crate) const STATUS_OK: i32 = 200;

/// Outbound dependencies of a client.
pub struct ClientPorts {
    /// Hashing and signing.
    pub crypto: Arc<dyn CryptoSuite>,
    /// Discovery service.
    pub discovery: Arc<dyn DiscoveryClient>,
    /// Dials endorsing peers.
    pub peers: Arc<dyn PeerConnector>,
    /// Dials orderers.
    pub orderers: Arc<dyn OrdererConnector>,
}

/// Outcome of a submitted transaction.
#[derive(Clone, Debug)]
pub struct InvokeResponse {
    /// Id of the submitted transaction.
    pub tx_id: TransactionId,
    /// Status returned by the accepting orderer.
    pub status: Status,
}

/// Outcome of a single-endorser query.
#[derive(Clone, Debug)]
pub struct QueryResponse {
    /// Peer that answered.
    pub peer: String,
    /// Id of the query proposal.
    pub tx_id: TransactionId,
    /// The peer's full response.
    pub response: ProposalResponse,
}

impl QueryResponse {
    /// Bytes returned by the chaincode.
    pub fn payload(&self) -> &[u8] {
        self.response
            .response
            .as_ref()
            .map(|r| r.payload.as_slice())
            .unwrap_or_default()
    }
}

/// Result of a system query on one peer.
#[derive(Debug)]
pub struct PeerQueryResult<T> {
    /// Peer asked.
    pub peer: String,
    /// Decoded answer or why there is none.
    pub result: Result<T, ClientError>,
}

impl<T> PeerQueryResult<T> {
    pub(crate) fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, ClientError>) -> PeerQueryResult<U> {
        PeerQueryResult {
            peer: self.peer,
            result: self.result.and_then(f),
        }
    }
}

/// Commit client for one identity-agnostic process.
///
/// Identities are passed per call; the client holds connections, the
/// endorsement group table and the status registry.
pub struct FabricClient {
    pub(crate) config: ClientConfig,
    pub(crate) proposals: Arc<ProposalBuilder>,
    pub(crate) groups: EndorsementGroupResolver,
    pub(crate) directory: Arc<InMemoryPeerDirectory>,
    pub(crate) endorsement: EndorsementOrchestrator,
    pub(crate) assembler: TransactionAssembler,
    pub(crate) orderers: OrdererClient,
    pub(crate) registry: TxStatusRegistry,
    pub(crate) peer_connector: Arc<dyn PeerConnector>,
    pub(crate) orderer_connector: Arc<dyn OrdererConnector>,
}

impl FabricClient {
    /// Create a client. Nothing is dialed until a channel is refreshed.
    ///
    /// Statuses go through the process-wide registry unless
    /// [`with_registry`](Self::with_registry) is used.
    pub fn new(config: ClientConfig, ports: ClientPorts) -> Self {
        let table = Arc::new(EndorsementGroupTable::new());
        let directory = Arc::new(InMemoryPeerDirectory::new());
        let proposals = Arc::new(ProposalBuilder::new(Arc::clone(&ports.crypto)));

        Self {
            groups: EndorsementGroupResolver::new(ports.discovery, Arc::clone(&table)),
            endorsement: EndorsementOrchestrator::new(
                config.orchestrator.clone(),
                table,
                directory.clone(),
            ),
            assembler: TransactionAssembler::new(ports.crypto),
            orderers: OrdererClient::new(config.orderer.clone(), proposals.clone()),
            registry: TxStatusRegistry::global().clone(),
            peer_connector: ports.peers,
            orderer_connector: ports.orderers,
            proposals,
            directory,
            config,
        }
    }

    /// Use `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: TxStatusRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registry that `invoke_and_wait` waits on.
    pub fn registry(&self) -> &TxStatusRegistry {
        &self.registry
    }

    /// Connected peers, per channel.
    pub fn peer_directory(&self) -> &Arc<InMemoryPeerDirectory> {
        &self.directory
    }

    /// Orderer client, for registering connections by hand.
    pub fn orderer_client(&self) -> &OrdererClient {
        &self.orderers
    }

    /// Endorsement group resolver.
    pub fn endorsement_groups(&self) -> &EndorsementGroupResolver {
        &self.groups
    }

    // =========================================================================
    // DISCOVERY
    // =========================================================================

    /// Rediscover `channel`: replace its endorsement groups, reconnect its
    /// peers and orderers.
    ///
    /// Discovery and dialing happen first; the group table, the peer pool
    /// and the orderer list are only replaced once all three are usable, so
    /// a failed refresh leaves the previous state in place.
    pub async fn refresh_channel(&self, channel: &str) -> Result<ResolvedChannel, ClientError> {
        let chaincodes = self
            .config
            .chaincodes(channel)
            .ok_or_else(|| ClientError::UnknownChannel {
                channel: channel.to_string(),
            })?;
        let collections = self.config.collections_for(channel);
        let resolved = self.groups.resolve(channel, chaincodes, &collections).await?;

        let mut peers: Vec<Arc<dyn EndorserConnection>> = Vec::new();
        for endpoint in resolved.peers.values().flatten() {
            match self.peer_connector.connect(endpoint) {
                Ok(peer) => peers.push(peer),
                Err(e) => warn!(
                    channel = %channel,
                    msp = %endpoint.msp_id,
                    address = %endpoint.address,
                    error = %e,
                    "Could not connect to peer"
                ),
            }
        }
        if peers.is_empty() {
            return Err(ClientError::NoPeers {
                channel: channel.to_string(),
            });
        }

        let endpoints = self.groups.orderer_endpoints(channel).await?;
        let orderers =
            self.orderers
                .dial_endpoints(channel, &endpoints, self.orderer_connector.as_ref());
        if orderers.is_empty() {
            return Err(OrdererError::ChannelNotConfigured {
                channel: channel.to_string(),
            }
            .into());
        }

        let connected_peers = peers.len();
        let connected_orderers = orderers.len();
        self.groups.commit(&resolved);
        self.directory.replace_channel(channel, peers);
        self.orderers.register_orderers(channel, orderers);

        info!(
            channel = %channel,
            peers = connected_peers,
            orderers = connected_orderers,
            "Channel refreshed"
        );
        Ok(resolved)
    }

    /// Refresh every configured channel, stopping at the first failure.
    pub async fn refresh_all(&self) -> Result<Vec<ResolvedChannel>, ClientError> {
        let mut resolved = Vec::with_capacity(self.config.channels.len());
        for channel in self.config.channels.keys() {
            resolved.push(self.refresh_channel(channel).await?);
        }
        Ok(resolved)
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Endorse, assemble and broadcast a transaction. Returns once an
    /// orderer accepts it, without waiting for commit.
    pub async fn invoke(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<InvokeResponse, ClientError> {
        let (proposal, tx_id) = self.proposals.build_proposal(identity, invocation)?;
        let reply = self.submit(identity, invocation, &proposal).await?;

        info!(tx_id = %tx_id, channel = %invocation.channel_id, chaincode = %invocation.chaincode_name, "Transaction submitted");
        Ok(InvokeResponse {
            tx_id,
            status: reply.status(),
        })
    }

    /// Like [`invoke`](Self::invoke), then wait for the commit status.
    ///
    /// The transaction id is registered before broadcast, so a status
    /// published right after ordering is not missed. The registration is
    /// released on every exit path.
    pub async fn invoke_and_wait(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<TxStatusEvent, ClientError> {
        let (proposal, tx_id) = self.proposals.build_proposal(identity, invocation)?;
        let waiter = self.registry.register(tx_id.as_str())?;

        self.submit(identity, invocation, &proposal).await?;
        debug!(tx_id = %tx_id, "Waiting for commit status");

        let event = waiter.wait_timeout(self.config.wait_timeout()).await?;
        info!(
            tx_id = %tx_id,
            block = event.block_number,
            valid = event.is_valid(),
            "Transaction committed"
        );
        Ok(event)
    }

    async fn submit(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
        proposal: &SignedProposal,
    ) -> Result<BroadcastResponse, ClientError> {
        let endorsements = self
            .endorsement
            .collect_endorsements(
                proposal,
                &invocation.channel_id,
                &invocation.chaincode_name,
                EndorsementMode::Quorum,
            )
            .await?;
        let envelope =
            self.assembler
                .assemble_and_seal(&proposal.proposal_bytes, &endorsements, identity)?;
        Ok(self.orderers.broadcast(&invocation.channel_id, &envelope).await?)
    }

    /// Feed a committed block into the status registry.
    ///
    /// Returns the number of transactions the block carries.
    pub fn publish_block(&self, block: &Block) -> Result<usize, ClientError> {
        let events = events_from_block(block)?;
        let count = events.len();
        for event in events {
            self.registry.publish(event);
        }
        debug!(block = block.number(), transactions = count, "Block statuses published");
        Ok(count)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Evaluate a chaincode call on one peer, without ordering.
    pub async fn query(
        &self,
        identity: &Identity,
        invocation: &ChaincodeInvocation,
    ) -> Result<QueryResponse, ClientError> {
        let (proposal, tx_id) = self.proposals.build_proposal(identity, invocation)?;
        let answer = self
            .endorsement
            .collect_endorsements(
                &proposal,
                &invocation.channel_id,
                &invocation.chaincode_name,
                EndorsementMode::Single,
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EndorsementError::NoAvailablePeer {
                channel: invocation.channel_id.clone(),
                chaincode: invocation.chaincode_name.clone(),
            })?;

        let (peer, response) = accepted(answer)?;
        debug!(peer = %peer, tx_id = %tx_id, "Query answered");
        Ok(QueryResponse {
            peer,
            tx_id,
            response,
        })
    }

    /// Ledger summary from every connected peer of `channel`.
    pub async fn query_channel_info(
        &self,
        identity: &Identity,
        channel: &str,
    ) -> Result<Vec<PeerQueryResult<BlockchainInfo>>, ClientError> {
        let answers = self
            .system_query(identity, channel, QSCC, &["GetChainInfo", channel])
            .await?;
        Ok(answers
            .into_iter()
            .map(|answer| answer.and_then(|payload| Ok(BlockchainInfo::decode(payload.as_slice())?)))
            .collect())
    }

    /// Highest ledger height reported by the channel's peers.
    pub async fn query_chain_height(&self, identity: &Identity, channel: &str) -> Result<u64, ClientError> {
        let mut height: Option<u64> = None;
        let mut first_error = None;

        for answer in self.query_channel_info(identity, channel).await? {
            match answer.result {
                Ok(info) => height = height.max(Some(info.height)),
                Err(e) => {
                    warn!(peer = %answer.peer, error = %e, "Chain info query failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match (height, first_error) {
            (Some(height), _) => Ok(height),
            (None, Some(e)) => Err(e),
            (None, None) => Err(ClientError::NoPeers {
                channel: channel.to_string(),
            }),
        }
    }

    /// Validation code of `tx_id` as seen by every connected peer of
    /// `channel`.
    pub async fn query_transaction(
        &self,
        identity: &Identity,
        channel: &str,
        tx_id: &str,
    ) -> Result<Vec<PeerQueryResult<TxValidationCode>>, ClientError> {
        let answers = self
            .system_query(identity, channel, QSCC, &["GetTransactionByID", channel, tx_id])
            .await?;
        Ok(answers
            .into_iter()
            .map(|answer| answer.and_then(|payload| Ok(decode_processed_transaction(&payload)?)))
            .collect())
    }

    /// Call a system chaincode on every connected peer of `channel`.
    pub(crate) async fn system_query(
        &self,
        identity: &Identity,
        channel: &str,
        chaincode: &str,
        args: &[&str],
    ) -> Result<Vec<PeerQueryResult<Vec<u8>>>, ClientError> {
        let peers = self.directory.channel_peers(channel);
        if peers.is_empty() {
            return Err(ClientError::NoPeers {
                channel: channel.to_string(),
            });
        }

        let invocation = ChaincodeInvocation::new(channel, chaincode, args.iter().copied());
        let (proposal, _) = self.proposals.build_proposal(identity, &invocation)?;
        let answers = self.endorsement.endorse_all(&proposal, &peers).await;

        Ok(answers.into_iter().map(chaincode_result).collect())
    }

    // =========================================================================
    // ORDERING SERVICE
    // =========================================================================

    /// Block 0 of `channel`.
    pub async fn fetch_genesis_block(&self, identity: &Identity, channel: &str) -> Result<Block, ClientError> {
        Ok(self.orderers.fetch_genesis_block(channel, identity).await?)
    }

    /// Block `number` of `channel`.
    pub async fn fetch_block(&self, identity: &Identity, channel: &str, number: u64) -> Result<Block, ClientError> {
        Ok(self.orderers.fetch_block(channel, identity, number).await?)
    }

    /// True if any orderer of `channel` is ready.
    pub fn is_orderer_ready(&self, channel: &str) -> bool {
        self.orderers.is_ready(channel)
    }
}

/// Peer name and response of an answer with status 200.
pub(crate) fn accepted(answer: PeerEndorsementResponse) -> Result<(String, ProposalResponse), ClientError> {
    let PeerEndorsementResponse { peer, result, .. } = answer;
    match result {
        Err(source) => Err(ClientError::Transport { peer, source }),
        Ok(response) if response.status() == STATUS_OK => Ok((peer, response)),
        Ok(response) => Err(ClientError::QueryFailed {
            status: response.status(),
            message: response.message().to_string(),
            peer,
        }),
    }
}

/// Chaincode result bytes of an accepted answer.
pub(crate) fn chaincode_result(answer: PeerEndorsementResponse) -> PeerQueryResult<Vec<u8>> {
    PeerQueryResult {
        peer: answer.peer.clone(),
        result: accepted(answer).map(|(_, response)| response.response.map(|r| r.payload).unwrap_or_default()),
    }
}
