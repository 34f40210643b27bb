//! # Orderer Failover
//!
//! Broadcast and deliver against a channel with several orderers, driven
//! through the proposal builder for seek signing.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use fc_01_proposal::ProposalBuilder;
    use fc_05_orderer_client::{
        MockOrderer, OrdererApi, OrdererClient, OrdererClientConfig, OrdererConnection,
        OrdererError,
    };
    use shared_crypto::{MockCryptoSuite, PrivateKeyHandle};
    use shared_types::protos::common::{Block, BlockHeader, Envelope, Status};
    use shared_types::Identity;

    // =============================================================================
    // TEST HELPERS
    // =============================================================================

    fn client(orderers: Vec<Arc<MockOrderer>>) -> OrdererClient {
        let client = OrdererClient::new(
            OrdererClientConfig::for_testing(),
            Arc::new(ProposalBuilder::new(Arc::new(MockCryptoSuite::new()))),
        );
        client.register_orderers(
            "ch1",
            orderers
                .into_iter()
                .map(|o| o as Arc<dyn OrdererConnection>)
                .collect(),
        );
        client
    }

    fn envelope() -> Envelope {
        Envelope {
            payload: b"tx".to_vec(),
            signature: b"sig".to_vec(),
        }
    }

    fn identity() -> Identity {
        Identity::new("OrgA", b"cert".to_vec(), PrivateKeyHandle::new(vec![1; 32]))
    }

    fn genesis() -> Block {
        Block {
            header: Some(BlockHeader::default()),
            ..Default::default()
        }
    }

    // =============================================================================
    // BROADCAST
    // =============================================================================

    /// First orderer unreachable, second busy, third accepts.
    #[tokio::test]
    async fn test_third_orderer_accepts() {
        let third = Arc::new(MockOrderer::new("o3"));
        let client = client(vec![
            Arc::new(MockOrderer::failing("o1")),
            Arc::new(MockOrderer::new("o2").with_broadcast_status(Status::ServiceUnavailable, "busy")),
            third.clone(),
        ]);

        let response = client.broadcast("ch1", &envelope()).await.unwrap();

        assert_eq!(response.status(), Status::Success);
        assert_eq!(third.broadcasts(), vec![envelope()]);
    }

    #[tokio::test]
    async fn test_every_orderer_failure_reported() {
        let client = client(vec![
            Arc::new(MockOrderer::failing("o1")),
            Arc::new(MockOrderer::failing("o2")),
            Arc::new(MockOrderer::new("o3").with_broadcast_status(Status::Forbidden, "denied")),
        ]);

        match client.broadcast("ch1", &envelope()).await {
            Err(OrdererError::AllOrderersFailed { channel, failures }) => {
                assert_eq!(channel, "ch1");
                assert_eq!(failures.len(), 3);
                assert_eq!(failures[2].orderer(), Some("o3"));
                assert!(matches!(failures[2], OrdererError::BadStatus { status: 403, .. }));
            }
            other => panic!("expected AllOrderersFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_ready_orderer_skipped() {
        let second = Arc::new(MockOrderer::new("o2"));
        let client = client(vec![Arc::new(MockOrderer::new("o1").not_ready()), second.clone()]);

        assert!(client.is_ready("ch1"));
        client.broadcast("ch1", &envelope()).await.unwrap();
        assert_eq!(second.broadcasts().len(), 1);
    }

    // =============================================================================
    // DELIVER
    // =============================================================================

    /// A hanging deliver stream times out and the next orderer serves the block.
    #[tokio::test(start_paused = true)]
    async fn test_genesis_after_deliver_timeout() {
        let slow = Arc::new(
            MockOrderer::new("o1")
                .with_blocks(vec![genesis()])
                .with_deliver_delay(Duration::from_secs(60)),
        );
        let fast = Arc::new(MockOrderer::new("o2").with_blocks(vec![genesis()]));
        let client = client(vec![slow.clone(), fast.clone()]);

        let block = client.fetch_genesis_block("ch1", &identity()).await.unwrap();

        assert_eq!(block.number(), 0);
        assert_eq!(slow.seeks().len(), 1);
        assert_eq!(fast.seeks().len(), 1);
    }

    /// Every orderer hangs: the caller sees the deliver timeout itself.
    #[tokio::test(start_paused = true)]
    async fn test_genesis_timeout_reaches_caller() {
        let hanging = |name: &str| {
            Arc::new(
                MockOrderer::new(name)
                    .with_blocks(vec![genesis()])
                    .with_deliver_delay(Duration::from_secs(60)),
            )
        };
        let client = client(vec![hanging("o1"), hanging("o2")]);

        let err = client.fetch_genesis_block("ch1", &identity()).await.unwrap_err();
        assert!(err.is_timeout(), "expected a timeout, got {err:?}");
        assert_eq!(err.orderer(), Some("o2"));
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_configured() {
        let client = client(vec![Arc::new(MockOrderer::new("o1"))]);
        let err = client.fetch_genesis_block("ch2", &identity()).await.unwrap_err();
        assert!(matches!(err, OrdererError::ChannelNotConfigured { .. }));
        assert!(!client.is_ready("ch2"));
    }
}
