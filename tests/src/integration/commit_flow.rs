//! # Commit Flow
//!
//! A transaction from proposal to commit status, first through the
//! components directly with real ECDSA signing, then through the client
//! facade.
//!
//! ## Flow Tested:
//!
//! 1. **Proposal (01) → Endorsement (03)**: a signed proposal reaches one
//!    peer per organization of a layout
//! 2. **Endorsement (03) → Assembly (04)**: matching responses become one
//!    signed envelope
//! 3. **Orderer (05) → Status (06)**: the committed block releases the waiter

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use anyhow::{anyhow, Result};
    use prost::Message;

    use client_runtime::{ClientConfig, ClientPorts, FabricClient};
    use fc_01_proposal::{ProposalApi, ProposalBuilder};
    use fc_02_endorsement_groups::{
        ChannelConfig, EndorsementDescriptor, EndorsementGroupTable, EndorsementLayout, Endorser,
        Endpoint, Layout, MockDiscoveryClient,
    };
    use fc_03_endorsement::{
        EndorsementApi, EndorsementMode, EndorsementOrchestrator, InMemoryPeerDirectory,
        MockEndorser, MockPeerConnector, OrchestratorConfig,
    };
    use fc_04_tx_assembly::TransactionAssembler;
    use fc_05_orderer_client::{MockOrderer, MockOrdererConnector};
    use fc_06_tx_status::{TxStatusApi, TxStatusRegistry, TRANSACTIONS_FILTER_INDEX};
    use shared_crypto::{EcdsaSuite, MockCryptoSuite, PrivateKeyHandle};
    use shared_types::protos::common::{
        Block, BlockData, BlockHeader, BlockMetadata, ChannelHeader, Envelope, Payload,
    };
    use shared_types::protos::peer::{
        ChaincodeActionPayload, ChaincodeProposalPayload, Transaction, TxValidationCode,
    };
    use shared_types::{ChaincodeInvocation, Identity};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const CERT: &[u8] = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";

    fn layout(orgs: &[&str]) -> EndorsementLayout {
        EndorsementLayout::new(orgs.iter().map(|o| o.to_string())).unwrap()
    }

    /// Orchestrator over a fixed table and peer set.
    fn orchestrator(
        layouts: Vec<EndorsementLayout>,
        peers: Vec<MockEndorser>,
    ) -> EndorsementOrchestrator {
        let table = Arc::new(EndorsementGroupTable::new());
        table.replace("ch1", "cc1", layouts);
        let directory = Arc::new(InMemoryPeerDirectory::new());
        for peer in peers {
            directory.add_peer("ch1", Arc::new(peer));
        }
        EndorsementOrchestrator::new(OrchestratorConfig::for_testing(), table, directory)
    }

    fn committed_block(number: u64, envelope: &Envelope, code: TxValidationCode) -> Block {
        let mut metadata = vec![Vec::new(); TRANSACTIONS_FILTER_INDEX + 1];
        metadata[TRANSACTIONS_FILTER_INDEX] = vec![code as u8];
        Block {
            header: Some(BlockHeader {
                number,
                ..Default::default()
            }),
            data: Some(BlockData {
                data: vec![envelope.encode_to_vec()],
            }),
            metadata: Some(BlockMetadata { metadata }),
        }
    }

    // =============================================================================
    // COMPONENT CHAIN
    // =============================================================================

    /// Two organizations endorse the same simulation result; the envelope
    /// carries both endorsements and verifies under the caller's key.
    #[tokio::test]
    async fn test_two_org_layout_yields_signed_transaction() -> Result<()> {
        let suite = Arc::new(EcdsaSuite::new());
        let key = EcdsaSuite::generate_key();
        let public_key = EcdsaSuite::public_key(&key)?;
        let identity = Identity::new("OrgA", CERT.to_vec(), key);

        let builder = ProposalBuilder::new(suite.clone());
        let invocation = ChaincodeInvocation::new("ch1", "cc1", ["move", "a", "b", "10"])
            .with_transient("secret", b"s3cr3t".to_vec());
        let (proposal, tx_id) = builder.build_proposal(&identity, &invocation)?;
        suite.verify(&proposal.proposal_bytes, &proposal.signature, &public_key)?;

        let endorsement = orchestrator(
            vec![layout(&["OrgA", "OrgB"])],
            vec![
                MockEndorser::ok("peer0.a", "OrgA", b"P".to_vec()),
                MockEndorser::ok("peer0.b", "OrgB", b"P".to_vec()),
            ],
        );
        let responses = endorsement
            .collect_endorsements(&proposal, "ch1", "cc1", EndorsementMode::Quorum)
            .await?;
        assert_eq!(responses.len(), 2);

        let envelope = TransactionAssembler::new(suite.clone()).assemble_and_seal(
            &proposal.proposal_bytes,
            &responses,
            &identity,
        )?;
        suite.verify(&envelope.payload, &envelope.signature, &public_key)?;

        let payload = Payload::decode(envelope.payload.as_slice())?;
        let header = payload.header.ok_or_else(|| anyhow!("payload without header"))?;
        assert_eq!(ChannelHeader::decode(header.channel_header.as_slice())?.tx_id, tx_id.as_str());

        let transaction = Transaction::decode(payload.data.as_slice())?;
        assert_eq!(transaction.actions.len(), 1);
        let action_payload = ChaincodeActionPayload::decode(transaction.actions[0].payload.as_slice())?;
        let endorsed = action_payload.action.ok_or_else(|| anyhow!("no endorsed action"))?;
        assert_eq!(endorsed.endorsements.len(), 2);
        assert_eq!(endorsed.proposal_response_payload, b"P".to_vec());

        let proposal_payload =
            ChaincodeProposalPayload::decode(action_payload.chaincode_proposal_payload.as_slice())?;
        assert!(proposal_payload.transient_map.is_empty());
        Ok(())
    }

    /// With OrgB down, only the alternative layout can be satisfied,
    /// whichever layout the orchestrator picks first.
    #[tokio::test]
    async fn test_alternative_layout_when_org_down() -> Result<()> {
        let builder = ProposalBuilder::new(Arc::new(MockCryptoSuite::new()));
        let identity = Identity::new("OrgA", CERT.to_vec(), PrivateKeyHandle::new(vec![9; 32]));
        let (proposal, _) =
            builder.build_proposal(&identity, &ChaincodeInvocation::new("ch1", "cc1", ["put"]))?;

        let endorsement = orchestrator(
            vec![layout(&["OrgA", "OrgB"]), layout(&["OrgA", "OrgC"])],
            vec![
                MockEndorser::ok("peer0.a", "OrgA", b"P".to_vec()),
                MockEndorser::failing("peer0.b", "OrgB"),
                MockEndorser::ok("peer0.c", "OrgC", b"P".to_vec()),
            ],
        );
        let responses = endorsement
            .collect_endorsements(&proposal, "ch1", "cc1", EndorsementMode::Quorum)
            .await?;

        let mut orgs: Vec<&str> = responses.iter().map(|r| r.msp_id.as_str()).collect();
        orgs.sort_unstable();
        assert_eq!(orgs, vec!["OrgA", "OrgC"]);
        Ok(())
    }

    // =============================================================================
    // CLIENT FACADE
    // =============================================================================

    fn discovery() -> Arc<MockDiscoveryClient> {
        let discovery = Arc::new(MockDiscoveryClient::new());
        let endorser = |msp: &str, endpoint: &str| Endorser {
            msp_id: msp.to_string(),
            endpoint: endpoint.to_string(),
            ledger_height: 10,
            identity: String::new(),
        };

        let mut endorsers_by_group = BTreeMap::new();
        endorsers_by_group.insert("G0".to_string(), vec![endorser("OrgA", "peer0.a:7051")]);
        endorsers_by_group.insert("G1".to_string(), vec![endorser("OrgB", "peer0.b:7051")]);
        discovery.set_descriptors(
            "ch1",
            vec![EndorsementDescriptor {
                chaincode: "cc1".to_string(),
                endorsers_by_group,
                layouts: vec![Layout {
                    quantities_by_group: [("G0".to_string(), 1), ("G1".to_string(), 1)]
                        .into_iter()
                        .collect(),
                }],
            }],
        );

        let mut config = ChannelConfig::default();
        config.orderers.insert(
            "OrdererOrg".to_string(),
            vec![Endpoint {
                host: "orderer0".to_string(),
                port: 7050,
            }],
        );
        discovery.set_config("ch1", config);
        discovery
    }

    /// Refresh, invoke and wait; a spawned task plays the block-event source
    /// by committing whatever the orderer received.
    #[tokio::test]
    async fn test_client_invoke_and_wait() -> Result<()> {
        let peers = Arc::new(MockPeerConnector::new());
        peers.add("peer0.a:7051", Arc::new(MockEndorser::ok("peer0.a", "OrgA", b"P".to_vec())));
        peers.add("peer0.b:7051", Arc::new(MockEndorser::ok("peer0.b", "OrgB", b"P".to_vec())));
        let orderer = Arc::new(MockOrderer::new("OrdererOrg-0"));
        let orderers = Arc::new(MockOrdererConnector::new());
        orderers.add("orderer0:7050", orderer.clone());

        let mut config = ClientConfig::for_testing();
        config.channels.insert("ch1".to_string(), vec!["cc1".to_string()]);
        let registry = TxStatusRegistry::new();
        let client = Arc::new(
            FabricClient::new(
                config,
                ClientPorts {
                    crypto: Arc::new(EcdsaSuite::new()),
                    discovery: discovery(),
                    peers,
                    orderers,
                },
            )
            .with_registry(registry.clone()),
        );
        client.refresh_all().await?;

        let committer = {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                loop {
                    if let Some(envelope) = orderer.broadcasts().first() {
                        let block = committed_block(12, envelope, TxValidationCode::Valid);
                        return client.publish_block(&block);
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
        };

        let identity = Identity::new("OrgA", CERT.to_vec(), EcdsaSuite::generate_key());
        let event = client
            .invoke_and_wait(&identity, &ChaincodeInvocation::new("ch1", "cc1", ["move", "a", "b", "10"]))
            .await?;

        assert!(event.is_valid());
        assert_eq!(event.block_number, 12);
        assert_eq!(committer.await??, 1);
        assert_eq!(registry.pending(), 0);
        Ok(())
    }
}
