//! # Channel and Chaincode Administration
//!
//! Calls to the configuration (`cscc`) and lifecycle (`lscc`) system
//! chaincodes, and channel configuration updates.
//!
//! Peers that have not joined a channel yet cannot come from discovery, so
//! the peer-scoped operations (join, install, installed and channel listings)
//! take the endpoints to dial. Channel-scoped operations use the pool built
//! by [`FabricClient::refresh_channel`].
//!
//! | Operation | Chaincode | Scope |
//! |-----------|-----------|-------|
//! | `join_channel` | `cscc JoinChain` | listed peers |
//! | `install_chaincode` | `lscc install` | listed peers |
//! | `query_installed_chaincodes` | `lscc getinstalledchaincodes` | listed peers |
//! | `query_channels` | `cscc GetChannels` | listed peers |
//! | `instantiate_chaincode` | `lscc deploy` / `upgrade` | channel pool, then ordered |
//! | `query_instantiated_chaincodes` | `lscc getchaincodes` | channel pool |
//! | `update_channel` | config update envelope | orderers of the channel |

use std::sync::Arc;

use fc_01_proposal::ProposalApi;
use fc_02_endorsement_groups::{OrdererEndpoint, PeerEndpoint};
use fc_03_endorsement::{EndorsementApi, EndorserConnection, PeerDirectory};
use fc_05_orderer_client::{OrdererApi, OrdererError};
use prost::Message;
use shared_types::protos::common::{ConfigUpdateEnvelope, Status};
use shared_types::protos::peer::{
    chaincode_spec, ChaincodeDeploymentSpec, ChaincodeId, ChaincodeInfo, ChaincodeInput,
    ChaincodeQueryResponse, ChaincodeSpec, ChannelQueryResponse,
};
use shared_types::{ChaincodeInvocation, ChaincodeType, Identity};
use tracing::{debug, info, warn};

use crate::client::{accepted, chaincode_result, FabricClient, InvokeResponse, PeerQueryResult};
use crate::errors::ClientError;

/// Configuration system chaincode.
pub const CSCC: &str = "cscc";

/// Lifecycle system chaincode.
pub const LSCC: &str = "lscc";

const DEFAULT_ESCC: &str = "escc";
const DEFAULT_VSCC: &str = "vscc";

/// Chaincode package to install on peers.
#[derive(Clone, Debug, Default)]
pub struct InstallRequest {
    /// Chaincode name.
    pub name: String,
    /// Chaincode version.
    pub version: String,
    /// Import path of the chaincode source.
    pub path: String,
    /// Chaincode runtime.
    pub chaincode_type: ChaincodeType,
    /// Packaged source, as built by the platform packager.
    pub code_package: Vec<u8>,
}

/// Whether an instantiation creates or replaces a chaincode definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LifecycleOperation {
    /// First instantiation on the channel.
    #[default]
    Deploy,
    /// Replace the running version.
    Upgrade,
}

impl LifecycleOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Deploy => "deploy",
            Self::Upgrade => "upgrade",
        }
    }
}

/// Chaincode definition to instantiate or upgrade on a channel.
#[derive(Clone, Debug, Default)]
pub struct InstantiateRequest {
    /// Deploy or upgrade.
    pub operation: LifecycleOperation,
    /// Chaincode name.
    pub name: String,
    /// Installed version to run.
    pub version: String,
    /// Import path of the chaincode source.
    pub path: String,
    /// Chaincode runtime.
    pub chaincode_type: ChaincodeType,
    /// Arguments passed to the chaincode's init function.
    pub args: Vec<Vec<u8>>,
    /// Encoded endorsement policy. Empty lets the peer apply its default.
    pub policy: Vec<u8>,
    /// Encoded private data collection package. Empty for none.
    pub collections: Vec<u8>,
}

fn require(field: &str, value: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} is empty", field)));
    }
    Ok(())
}

fn deployment_spec(
    name: &str,
    version: &str,
    path: &str,
    chaincode_type: ChaincodeType,
    args: Vec<Vec<u8>>,
    code_package: Vec<u8>,
) -> ChaincodeDeploymentSpec {
    let runtime: chaincode_spec::Type = chaincode_type.into();
    ChaincodeDeploymentSpec {
        chaincode_spec: Some(ChaincodeSpec {
            r#type: runtime as i32,
            chaincode_id: Some(ChaincodeId {
                path: path.to_string(),
                name: name.to_string(),
                version: version.to_string(),
            }),
            input: Some(ChaincodeInput {
                args,
                ..Default::default()
            }),
            timeout: 0,
        }),
        code_package,
    }
}

impl FabricClient {
    // =========================================================================
    // ORDERERS
    // =========================================================================

    /// Dial `endpoints` and register the reachable ones for `channel`.
    ///
    /// For channels discovery cannot describe yet, such as one being joined
    /// or created. Returns the number of connected orderers.
    pub fn connect_orderers(&self, channel: &str, endpoints: &[OrdererEndpoint]) -> Result<usize, ClientError> {
        let orderers = self
            .orderers
            .dial_endpoints(channel, endpoints, self.orderer_connector.as_ref());
        if orderers.is_empty() {
            return Err(OrdererError::ChannelNotConfigured {
                channel: channel.to_string(),
            }
            .into());
        }
        let connected = orderers.len();
        self.orderers.register_orderers(channel, orderers);
        Ok(connected)
    }

    // =========================================================================
    // CHANNELS
    // =========================================================================

    /// Join the listed peers to `channel`.
    ///
    /// The genesis block is fetched from the channel's orderers and handed to
    /// each peer's configuration chaincode. One result per peer, in input
    /// order.
    pub async fn join_channel(
        &self,
        identity: &Identity,
        channel: &str,
        peers: &[PeerEndpoint],
    ) -> Result<Vec<PeerQueryResult<()>>, ClientError> {
        let targets = self.dial_targets(peers)?;
        let genesis = self.fetch_genesis_block(identity, channel).await?;

        let answers = self
            .peer_call(identity, &targets, CSCC, vec![b"JoinChain".to_vec(), genesis.encode_to_vec()])
            .await?;
        let results: Vec<PeerQueryResult<()>> = answers.into_iter().map(|a| a.and_then(|_| Ok(()))).collect();

        info!(
            channel = %channel,
            peers = results.len(),
            joined = results.iter().filter(|r| r.result.is_ok()).count(),
            "Join requested"
        );
        Ok(results)
    }

    /// Channels each listed peer has joined.
    pub async fn query_channels(
        &self,
        identity: &Identity,
        peers: &[PeerEndpoint],
    ) -> Result<Vec<PeerQueryResult<Vec<String>>>, ClientError> {
        let targets = self.dial_targets(peers)?;
        let answers = self
            .peer_call(identity, &targets, CSCC, vec![b"GetChannels".to_vec()])
            .await?;
        Ok(answers
            .into_iter()
            .map(|answer| {
                answer.and_then(|payload| {
                    let listing = ChannelQueryResponse::decode(payload.as_slice())?;
                    Ok(listing.channels.into_iter().map(|c| c.channel_id).collect())
                })
            })
            .collect())
    }

    /// Sign a configuration update for `channel` and broadcast it.
    ///
    /// `config_update` is an encoded `ConfigUpdateEnvelope`; signatures it
    /// already carries are kept and the caller's is appended. A channel that
    /// does not exist yet needs its orderers registered through
    /// [`connect_orderers`](Self::connect_orderers) first.
    pub async fn update_channel(
        &self,
        identity: &Identity,
        channel: &str,
        config_update: &[u8],
    ) -> Result<Status, ClientError> {
        let update = ConfigUpdateEnvelope::decode(config_update)?;
        if update.config_update.is_empty() {
            return Err(ClientError::InvalidRequest("config update is empty".to_string()));
        }

        let envelope = self.proposals.build_config_update_envelope(identity, channel, update)?;
        let reply = self.orderers.broadcast(channel, &envelope).await?;

        info!(channel = %channel, "Channel config update accepted");
        Ok(reply.status())
    }

    // =========================================================================
    // CHAINCODE LIFECYCLE
    // =========================================================================

    /// Install a chaincode package on the listed peers.
    pub async fn install_chaincode(
        &self,
        identity: &Identity,
        request: &InstallRequest,
        peers: &[PeerEndpoint],
    ) -> Result<Vec<PeerQueryResult<()>>, ClientError> {
        require("chaincode name", &request.name)?;
        require("chaincode version", &request.version)?;
        let targets = self.dial_targets(peers)?;

        let spec = deployment_spec(
            &request.name,
            &request.version,
            &request.path,
            request.chaincode_type,
            Vec::new(),
            request.code_package.clone(),
        );
        let answers = self
            .peer_call(identity, &targets, LSCC, vec![b"install".to_vec(), spec.encode_to_vec()])
            .await?;

        let results: Vec<PeerQueryResult<()>> = answers.into_iter().map(|a| a.and_then(|_| Ok(()))).collect();
        for failed in results.iter().filter(|r| r.result.is_err()) {
            warn!(peer = %failed.peer, chaincode = %request.name, "Install rejected");
        }
        Ok(results)
    }

    /// Chaincodes installed on each listed peer.
    pub async fn query_installed_chaincodes(
        &self,
        identity: &Identity,
        peers: &[PeerEndpoint],
    ) -> Result<Vec<PeerQueryResult<Vec<ChaincodeInfo>>>, ClientError> {
        let targets = self.dial_targets(peers)?;
        let answers = self
            .peer_call(identity, &targets, LSCC, vec![b"getinstalledchaincodes".to_vec()])
            .await?;
        Ok(answers.into_iter().map(|a| a.and_then(decode_chaincodes)).collect())
    }

    /// Chaincodes instantiated on `channel`, as seen by each connected peer.
    pub async fn query_instantiated_chaincodes(
        &self,
        identity: &Identity,
        channel: &str,
    ) -> Result<Vec<PeerQueryResult<Vec<ChaincodeInfo>>>, ClientError> {
        let answers = self
            .system_query(identity, channel, LSCC, &["getchaincodes"])
            .await?;
        Ok(answers.into_iter().map(|a| a.and_then(decode_chaincodes)).collect())
    }

    /// Instantiate or upgrade a chaincode on `channel`.
    ///
    /// Every connected peer of the channel must endorse; the transaction is
    /// then ordered like any other. Returns once an orderer accepts it.
    pub async fn instantiate_chaincode(
        &self,
        identity: &Identity,
        channel: &str,
        request: &InstantiateRequest,
    ) -> Result<InvokeResponse, ClientError> {
        require("chaincode name", &request.name)?;
        require("chaincode version", &request.version)?;

        let peers = self.directory.channel_peers(channel);
        if peers.is_empty() {
            return Err(ClientError::NoPeers {
                channel: channel.to_string(),
            });
        }

        let spec = deployment_spec(
            &request.name,
            &request.version,
            &request.path,
            request.chaincode_type,
            request.args.clone(),
            Vec::new(),
        );
        let mut args = vec![
            request.operation.as_str().as_bytes().to_vec(),
            channel.as_bytes().to_vec(),
            spec.encode_to_vec(),
            request.policy.clone(),
            DEFAULT_ESCC.as_bytes().to_vec(),
            DEFAULT_VSCC.as_bytes().to_vec(),
        ];
        if !request.collections.is_empty() {
            args.push(request.collections.clone());
        }

        let invocation = ChaincodeInvocation::new(channel, LSCC, args);
        let (proposal, tx_id) = self.proposals.build_proposal(identity, &invocation)?;
        let endorsements = self.endorsement.endorse_all(&proposal, &peers).await;
        for answer in &endorsements {
            accepted(answer.clone())?;
        }

        let envelope =
            self.assembler
                .assemble_and_seal(&proposal.proposal_bytes, &endorsements, identity)?;
        let reply = self.orderers.broadcast(channel, &envelope).await?;

        info!(
            tx_id = %tx_id,
            channel = %channel,
            chaincode = %request.name,
            version = %request.version,
            operation = request.operation.as_str(),
            "Chaincode definition submitted"
        );
        Ok(InvokeResponse {
            tx_id,
            status: reply.status(),
        })
    }

    // =========================================================================
    // PEER-SCOPED CALLS
    // =========================================================================

    fn dial_targets(&self, peers: &[PeerEndpoint]) -> Result<Vec<Arc<dyn EndorserConnection>>, ClientError> {
        if peers.is_empty() {
            return Err(ClientError::NoTargetPeers);
        }
        peers
            .iter()
            .map(|endpoint| {
                self.peer_connector
                    .connect(endpoint)
                    .map_err(|source| ClientError::Transport {
                        peer: endpoint.address.clone(),
                        source,
                    })
            })
            .collect()
    }

    async fn peer_call(
        &self,
        identity: &Identity,
        peers: &[Arc<dyn EndorserConnection>],
        chaincode: &str,
        args: Vec<Vec<u8>>,
    ) -> Result<Vec<PeerQueryResult<Vec<u8>>>, ClientError> {
        let (proposal, tx_id) = self.proposals.build_peer_proposal(identity, chaincode, args)?;
        debug!(tx_id = %tx_id, chaincode = %chaincode, peers = peers.len(), "Peer-scoped call");

        let answers = self.endorsement.endorse_all(&proposal, peers).await;
        Ok(answers.into_iter().map(chaincode_result).collect())
    }
}

fn decode_chaincodes(payload: Vec<u8>) -> Result<Vec<ChaincodeInfo>, ClientError> {
    Ok(ChaincodeQueryResponse::decode(payload.as_slice())?.chaincodes)
}
