//! # Outbound Ports
//!
//! Peer connections and the channel-scoped peer pools the orchestrator
//! draws from. Connections are owned by the connection-management layer;
//! the orchestrator only checks readiness and calls `process_proposal`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fc_02_endorsement_groups::PeerEndpoint;
use parking_lot::Mutex;
use shared_types::protos::peer::{Endorsement, ProposalResponse, Response, SignedProposal};
use shared_types::TransportError;

/// An established connection to one endorsing peer - outbound port.
#[async_trait]
pub trait EndorserConnection: Send + Sync {
    /// Peer name (for logging/debugging).
    fn name(&self) -> &str;

    /// Organization of the peer.
    fn msp_id(&self) -> &str;

    /// True if the underlying transport is ready for RPCs.
    fn is_ready(&self) -> bool;

    /// Send a signed proposal and wait for the peer's response.
    async fn process_proposal(
        &self,
        proposal: &SignedProposal,
    ) -> Result<ProposalResponse, TransportError>;
}

/// Channel-scoped peer pools - outbound port.
pub trait PeerDirectory: Send + Sync {
    /// Peers of `msp_id` joined to `channel`, in pool order.
    fn peers(&self, channel: &str, msp_id: &str) -> Vec<Arc<dyn EndorserConnection>>;

    /// Every peer joined to `channel`, grouped by organization.
    fn channel_peers(&self, channel: &str) -> Vec<Arc<dyn EndorserConnection>>;
}

/// Dials peer endpoints returned by discovery - outbound port.
pub trait PeerConnector: Send + Sync {
    /// Connection for `endpoint`.
    fn connect(&self, endpoint: &PeerEndpoint) -> Result<Arc<dyn EndorserConnection>, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock endorsing peer for testing.
pub struct MockEndorser {
    name: String,
    msp_id: String,
    ready: AtomicBool,
    outcome: Result<ProposalResponse, TransportError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    received: Mutex<Vec<SignedProposal>>,
}

impl MockEndorser {
    /// Peer that endorses with status 200 and simulation payload `payload`.
    pub fn ok(name: &str, msp_id: &str, payload: Vec<u8>) -> Self {
        Self::with_status(name, msp_id, 200, "", payload)
    }

    /// Peer that answers with an arbitrary chaincode status.
    pub fn with_status(name: &str, msp_id: &str, status: i32, message: &str, payload: Vec<u8>) -> Self {
        let response = ProposalResponse {
            version: 1,
            response: Some(Response {
                status,
                message: message.to_string(),
                payload: Vec::new(),
            }),
            payload,
            endorsement: Some(Endorsement {
                endorser: format!("{}@{}", name, msp_id).into_bytes(),
                signature: format!("sig-{}", name).into_bytes(),
            }),
            ..Default::default()
        };
        Self::build(name, msp_id, Ok(response))
    }

    /// Peer whose RPC always fails at the transport level.
    pub fn failing(name: &str, msp_id: &str) -> Self {
        Self::build(
            name,
            msp_id,
            Err(TransportError::Rpc(format!("{} unreachable", name))),
        )
    }

    fn build(name: &str, msp_id: &str, outcome: Result<ProposalResponse, TransportError>) -> Self {
        Self {
            name: name.to_string(),
            msp_id: msp_id.to_string(),
            ready: AtomicBool::new(true),
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Mark the transport as not ready.
    pub fn not_ready(self) -> Self {
        self.ready.store(false, Ordering::SeqCst);
        self
    }

    /// Delay every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Attach `payload` as the chaincode result, as system queries return it.
    pub fn with_result(mut self, payload: Vec<u8>) -> Self {
        if let Ok(response) = self.outcome.as_mut() {
            if let Some(inner) = response.response.as_mut() {
                inner.payload = payload;
            }
        }
        self
    }

    /// Flip readiness at runtime.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Number of `process_proposal` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Proposals received, in arrival order.
    pub fn proposals(&self) -> Vec<SignedProposal> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl EndorserConnection for MockEndorser {
    fn name(&self) -> &str {
        &self.name
    }

    fn msp_id(&self) -> &str {
        &self.msp_id
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn process_proposal(
        &self,
        proposal: &SignedProposal,
    ) -> Result<ProposalResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(proposal.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

/// Mock connector resolving endpoint addresses to mock peers.
#[derive(Default)]
pub struct MockPeerConnector {
    peers: Mutex<HashMap<String, Arc<MockEndorser>>>,
}

impl MockPeerConnector {
    /// Create an empty connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `address` to `peer`.
    pub fn add(&self, address: &str, peer: Arc<MockEndorser>) {
        self.peers.lock().insert(address.to_string(), peer);
    }
}

impl PeerConnector for MockPeerConnector {
    fn connect(&self, endpoint: &PeerEndpoint) -> Result<Arc<dyn EndorserConnection>, TransportError> {
        self.peers
            .lock()
            .get(&endpoint.address)
            .map(|peer| Arc::clone(peer) as Arc<dyn EndorserConnection>)
            .ok_or_else(|| TransportError::Rpc(format!("no route to {}", endpoint.address)))
    }
}
