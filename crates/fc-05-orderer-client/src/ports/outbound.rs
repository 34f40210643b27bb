//! # Outbound Ports
//!
//! Ordering-service transport. A connection opens one stream per call; the
//! client never reuses a stream across calls.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fc_02_endorsement_groups::OrdererEndpoint;
use parking_lot::Mutex;
use shared_types::protos::common::{Block, Envelope, Status};
use shared_types::protos::orderer::{BroadcastResponse, DeliverResponse};
use shared_types::TransportError;

/// Connection to one ordering node - outbound port.
#[async_trait]
pub trait OrdererConnection: Send + Sync {
    /// Orderer name (for logging/debugging).
    fn name(&self) -> &str;

    /// True if the underlying transport is ready for RPCs.
    fn is_ready(&self) -> bool;

    /// Open a `Broadcast` stream.
    async fn open_broadcast(&self) -> Result<Box<dyn BroadcastStream>, TransportError>;

    /// Dial a fresh connection and open a `Deliver` stream on it.
    async fn open_deliver(&self) -> Result<Box<dyn DeliverStream>, TransportError>;
}

/// Client side of a `Broadcast` stream.
#[async_trait]
pub trait BroadcastStream: Send {
    /// Send one envelope.
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Next response; `None` once the orderer closed the stream.
    async fn recv(&mut self) -> Result<Option<BroadcastResponse>, TransportError>;

    /// Half-close the stream.
    async fn close_send(&mut self) -> Result<(), TransportError>;
}

/// Client side of a `Deliver` stream.
#[async_trait]
pub trait DeliverStream: Send {
    /// Send a signed seek envelope.
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Next response; `None` once the orderer closed the stream.
    async fn recv(&mut self) -> Result<Option<DeliverResponse>, TransportError>;
}

/// Dials orderer endpoints derived from channel config - outbound port.
pub trait OrdererConnector: Send + Sync {
    /// Connection for `endpoint`.
    fn connect(&self, endpoint: &OrdererEndpoint) -> Result<Arc<dyn OrdererConnection>, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock ordering node for testing.
pub struct MockOrderer {
    name: String,
    ready: AtomicBool,
    broadcast: Result<BroadcastResponse, TransportError>,
    deliver: Result<Vec<DeliverResponse>, TransportError>,
    deliver_delay: Option<Duration>,
    broadcasts: Arc<Mutex<Vec<Envelope>>>,
    seeks: Arc<Mutex<Vec<Envelope>>>,
}

impl MockOrderer {
    /// Orderer that accepts every broadcast and has no blocks.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ready: AtomicBool::new(true),
            broadcast: Ok(BroadcastResponse {
                status: Status::Success as i32,
                info: String::new(),
            }),
            deliver: Ok(Vec::new()),
            deliver_delay: None,
            broadcasts: Arc::new(Mutex::new(Vec::new())),
            seeks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Orderer whose streams cannot be opened.
    pub fn failing(name: &str) -> Self {
        let error = TransportError::Rpc(format!("{} connection refused", name));
        Self {
            broadcast: Err(error.clone()),
            deliver: Err(error),
            ..Self::new(name)
        }
    }

    /// Answer broadcasts with `status`.
    pub fn with_broadcast_status(mut self, status: Status, info: &str) -> Self {
        self.broadcast = Ok(BroadcastResponse {
            status: status as i32,
            info: info.to_string(),
        });
        self
    }

    /// Deliver `blocks` followed by a SUCCESS status.
    pub fn with_blocks(self, blocks: Vec<Block>) -> Self {
        let mut script: Vec<DeliverResponse> = blocks.into_iter().map(DeliverResponse::block).collect();
        script.push(DeliverResponse::status(Status::Success));
        self.with_deliver_script(script)
    }

    /// Deliver exactly `script`, then close the stream.
    pub fn with_deliver_script(mut self, script: Vec<DeliverResponse>) -> Self {
        self.deliver = Ok(script);
        self
    }

    /// Delay every deliver response.
    pub fn with_deliver_delay(mut self, delay: Duration) -> Self {
        self.deliver_delay = Some(delay);
        self
    }

    /// Mark the transport as not ready.
    pub fn not_ready(self) -> Self {
        self.ready.store(false, Ordering::SeqCst);
        self
    }

    /// Envelopes received over broadcast.
    pub fn broadcasts(&self) -> Vec<Envelope> {
        self.broadcasts.lock().clone()
    }

    /// Seek envelopes received over deliver.
    pub fn seeks(&self) -> Vec<Envelope> {
        self.seeks.lock().clone()
    }
}

#[async_trait]
impl OrdererConnection for MockOrderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn open_broadcast(&self) -> Result<Box<dyn BroadcastStream>, TransportError> {
        let response = self.broadcast.clone()?;
        Ok(Box::new(MockBroadcastStream {
            response: Some(response),
            log: Arc::clone(&self.broadcasts),
        }))
    }

    async fn open_deliver(&self) -> Result<Box<dyn DeliverStream>, TransportError> {
        let script = self.deliver.clone()?;
        Ok(Box::new(MockDeliverStream {
            script: script.into(),
            delay: self.deliver_delay,
            log: Arc::clone(&self.seeks),
        }))
    }
}

struct MockBroadcastStream {
    response: Option<BroadcastResponse>,
    log: Arc<Mutex<Vec<Envelope>>>,
}

#[async_trait]
impl BroadcastStream for MockBroadcastStream {
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        self.log.lock().push(envelope.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<BroadcastResponse>, TransportError> {
        Ok(self.response.take())
    }

    async fn close_send(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

struct MockDeliverStream {
    script: VecDeque<DeliverResponse>,
    delay: Option<Duration>,
    log: Arc<Mutex<Vec<Envelope>>>,
}

#[async_trait]
impl DeliverStream for MockDeliverStream {
    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        self.log.lock().push(envelope.clone());
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<DeliverResponse>, TransportError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.script.pop_front())
    }
}

/// Mock connector resolving endpoint addresses to mock orderers.
#[derive(Default)]
pub struct MockOrdererConnector {
    orderers: Mutex<HashMap<String, Arc<MockOrderer>>>,
}

impl MockOrdererConnector {
    /// Create an empty connector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `address` to `orderer`.
    pub fn add(&self, address: &str, orderer: Arc<MockOrderer>) {
        self.orderers.lock().insert(address.to_string(), orderer);
    }
}

impl OrdererConnector for MockOrdererConnector {
    fn connect(&self, endpoint: &OrdererEndpoint) -> Result<Arc<dyn OrdererConnection>, TransportError> {
        self.orderers
            .lock()
            .get(&endpoint.address)
            .map(|orderer| Arc::clone(orderer) as Arc<dyn OrdererConnection>)
            .ok_or_else(|| TransportError::Rpc(format!("no route to {}", endpoint.address)))
    }
}
