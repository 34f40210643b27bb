//! # Status Registry Interleavings
//!
//! Waiters and publishers running on separate tasks, fed from decoded
//! blocks the way a block-event source would.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join_all;
    use prost::Message;

    use fc_06_tx_status::{
        events_from_block, TxStatusApi, TxStatusError, TxStatusEvent, TxStatusRegistry,
        TRANSACTIONS_FILTER_INDEX,
    };
    use shared_types::protos::common::{
        Block, BlockData, BlockHeader, BlockMetadata, ChannelHeader, Envelope, Header, Payload,
    };
    use shared_types::protos::peer::TxValidationCode;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn envelope_for(tx_id: &str) -> Vec<u8> {
        let header = Header {
            channel_header: ChannelHeader {
                channel_id: "ch1".to_string(),
                tx_id: tx_id.to_string(),
                ..Default::default()
            }
            .encode_to_vec(),
            signature_header: Vec::new(),
        };
        Envelope {
            payload: Payload {
                header: Some(header),
                data: Vec::new(),
            }
            .encode_to_vec(),
            signature: Vec::new(),
        }
        .encode_to_vec()
    }

    fn block(number: u64, txs: &[(&str, TxValidationCode)]) -> Block {
        let mut metadata = vec![Vec::new(); TRANSACTIONS_FILTER_INDEX + 1];
        metadata[TRANSACTIONS_FILTER_INDEX] = txs.iter().map(|(_, code)| *code as u8).collect();
        Block {
            header: Some(BlockHeader {
                number,
                ..Default::default()
            }),
            data: Some(BlockData {
                data: txs.iter().map(|(id, _)| envelope_for(id)).collect(),
            }),
            metadata: Some(BlockMetadata { metadata }),
        }
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_block_releases_each_waiter_with_its_code() {
        let registry = TxStatusRegistry::new();
        let valid = registry.register("t1").unwrap();
        let conflicted = registry.register("t2").unwrap();

        let committed = block(
            4,
            &[("t1", TxValidationCode::Valid), ("t2", TxValidationCode::MvccReadConflict)],
        );
        let publisher = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for event in events_from_block(&committed).unwrap() {
                    registry.publish(event);
                }
            })
        };

        let first = valid.wait().await.unwrap();
        let second = conflicted.wait().await.unwrap();
        publisher.await.unwrap();

        assert!(first.is_valid());
        assert_eq!(second.validation_code, TxValidationCode::MvccReadConflict);
        assert_eq!(second.block_number, 4);
        assert_eq!(registry.pending(), 0);
    }

    /// Many transactions registered up front, published in reverse order
    /// from concurrent tasks.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_publishers_reach_the_right_waiters() {
        let registry = TxStatusRegistry::new();
        let ids: Vec<String> = (0..64).map(|i| format!("tx-{i:03}")).collect();
        let waiters: Vec<_> = ids.iter().map(|id| registry.register(id).unwrap()).collect();

        let publishers: Vec<_> = ids
            .iter()
            .rev()
            .enumerate()
            .map(|(n, id)| {
                let registry = registry.clone();
                let event = TxStatusEvent::new(id.clone(), TxValidationCode::Valid, n as u64);
                tokio::spawn(async move { registry.publish(event) })
            })
            .collect();

        let events = join_all(waiters.into_iter().map(|w| w.wait())).await;
        join_all(publishers).await;

        for (id, event) in ids.iter().zip(events) {
            assert_eq!(&event.unwrap().tx_id, id);
        }
        assert_eq!(registry.pending(), 0);
    }

    #[tokio::test]
    async fn test_registration_released_by_drop() {
        let registry = TxStatusRegistry::new();
        let waiter = registry.register("tx").unwrap();
        assert!(matches!(
            registry.register("tx"),
            Err(TxStatusError::AlreadyRegistered { .. })
        ));

        drop(waiter);
        assert_eq!(registry.pending(), 0);
        assert!(registry.register("tx").is_ok());
    }

    /// A status published before anyone registered is not replayed.
    #[tokio::test(start_paused = true)]
    async fn test_early_publish_is_not_buffered() {
        let registry = TxStatusRegistry::new();
        registry.publish(TxStatusEvent::new("late", TxValidationCode::Valid, 1));

        let waiter = registry.register("late").unwrap();
        let err = waiter.wait_timeout(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, TxStatusError::Timeout { .. }));
    }
}
