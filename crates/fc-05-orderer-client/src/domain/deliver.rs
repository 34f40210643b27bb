//! Folding of deliver-stream responses into a block.

use shared_types::protos::common::{Block, Status};
use shared_types::protos::orderer::{deliver_response, DeliverResponse};

use super::OrdererError;

/// What the deliver loop does after one response.
#[derive(Debug, PartialEq)]
pub enum DeliverStep {
    /// Keep reading.
    Continue,
    /// Terminal success with the buffered block.
    Done(Block),
}

/// Buffers blocks until the orderer sends its terminal status.
#[derive(Debug)]
pub struct BlockCollector {
    orderer: String,
    block: Option<Block>,
}

impl BlockCollector {
    /// Collector for a stream from `orderer`.
    pub fn new(orderer: impl Into<String>) -> Self {
        Self {
            orderer: orderer.into(),
            block: None,
        }
    }

    /// Fold one response. A later block replaces an earlier one.
    pub fn accept(&mut self, response: DeliverResponse) -> Result<DeliverStep, OrdererError> {
        match response.r#type {
            Some(deliver_response::Type::Block(block)) => {
                self.block = Some(block);
                Ok(DeliverStep::Continue)
            }
            Some(deliver_response::Type::Status(status)) if status == Status::Success as i32 => {
                self.block
                    .take()
                    .map(DeliverStep::Done)
                    .ok_or_else(|| OrdererError::NoBlock {
                        orderer: self.orderer.clone(),
                    })
            }
            Some(deliver_response::Type::Status(status)) => Err(OrdererError::BadStatus {
                orderer: self.orderer.clone(),
                status,
                info: String::new(),
            }),
            None => Err(OrdererError::UnexpectedResponse {
                orderer: self.orderer.clone(),
            }),
        }
    }

    /// The stream ended without a terminal status.
    pub fn closed(&self) -> OrdererError {
        OrdererError::StreamClosed {
            orderer: self.orderer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::protos::common::BlockHeader;

    fn block(number: u64) -> Block {
        Block {
            header: Some(BlockHeader {
                number,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_block_then_success() {
        let mut collector = BlockCollector::new("o1");
        assert_eq!(collector.accept(DeliverResponse::block(block(0))).unwrap(), DeliverStep::Continue);
        assert_eq!(
            collector.accept(DeliverResponse::status(Status::Success)).unwrap(),
            DeliverStep::Done(block(0))
        );
    }

    #[test]
    fn test_success_without_block() {
        let mut collector = BlockCollector::new("o1");
        let err = collector.accept(DeliverResponse::status(Status::Success)).unwrap_err();
        assert_eq!(err, OrdererError::NoBlock { orderer: "o1".to_string() });
    }

    #[test]
    fn test_failure_status_is_hard_error() {
        let mut collector = BlockCollector::new("o1");
        collector.accept(DeliverResponse::block(block(3))).unwrap();
        let err = collector.accept(DeliverResponse::status(Status::NotFound)).unwrap_err();
        assert!(matches!(err, OrdererError::BadStatus { status: 404, .. }));
    }

    #[test]
    fn test_unknown_response_type() {
        let mut collector = BlockCollector::new("o1");
        let err = collector.accept(DeliverResponse { r#type: None }).unwrap_err();
        assert!(matches!(err, OrdererError::UnexpectedResponse { .. }));
    }
}
