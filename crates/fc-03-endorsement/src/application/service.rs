//! # Endorsement Orchestrator Service
//!
//! Fan-out/fan-in over the layouts stored in the endorsement group table.
//!
//! Layout and organization picks come from one PRNG seeded when the
//! orchestrator is built; peer order within an organization comes from the
//! configured [`PeerSelectionPolicy`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fc_02_endorsement_groups::{EndorsementGroupTable, EndorsementLayout};
use futures::future::join_all;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::protos::peer::SignedProposal;
use shared_types::{MspId, TransportError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::domain::{
    policy_for, EndorsementError, EndorsementMode, PeerEndorsementResponse, PeerSelectionPolicy,
};
use crate::ports::{EndorsementApi, EndorserConnection, PeerDirectory};

/// Endorsement Orchestrator - collects endorsements per layout.
pub struct EndorsementOrchestrator {
    table: Arc<EndorsementGroupTable>,
    directory: Arc<dyn PeerDirectory>,
    policy: Arc<dyn PeerSelectionPolicy>,
    rng: Mutex<StdRng>,
    config: OrchestratorConfig,
}

impl EndorsementOrchestrator {
    /// Create an orchestrator reading layouts from `table` and peers from
    /// `directory`.
    pub fn new(
        config: OrchestratorConfig,
        table: Arc<EndorsementGroupTable>,
        directory: Arc<dyn PeerDirectory>,
    ) -> Self {
        let policy = policy_for(config.peer_selection, config.layout_seed);
        Self::with_policy(config, table, directory, policy)
    }

    /// Create an orchestrator with a custom peer-selection policy.
    pub fn with_policy(
        config: OrchestratorConfig,
        table: Arc<EndorsementGroupTable>,
        directory: Arc<dyn PeerDirectory>,
        policy: Arc<dyn PeerSelectionPolicy>,
    ) -> Self {
        let rng = match config.layout_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            table,
            directory,
            policy,
            rng: Mutex::new(rng),
            config,
        }
    }

    /// The table layouts are read from.
    pub fn table(&self) -> &Arc<EndorsementGroupTable> {
        &self.table
    }

    fn layouts_for(
        &self,
        channel: &str,
        chaincode: &str,
    ) -> Result<Arc<[EndorsementLayout]>, EndorsementError> {
        match self.table.layouts(channel, chaincode) {
            Some(layouts) if !layouts.is_empty() => Ok(layouts),
            _ => Err(EndorsementError::UnknownChaincode {
                channel: channel.to_string(),
                chaincode: chaincode.to_string(),
            }),
        }
    }

    async fn collect_quorum(
        &self,
        proposal: &SignedProposal,
        channel: &str,
        chaincode: &str,
    ) -> Result<Vec<PeerEndorsementResponse>, EndorsementError> {
        let layouts = self.layouts_for(channel, chaincode)?;
        let target_index = self.rng.lock().gen_range(0..layouts.len());
        let target = &layouts[target_index];
        let required = target.len();

        debug!(
            channel = %channel,
            chaincode = %chaincode,
            layout = target_index,
            orgs = ?target.orgs(),
            "Endorsing against target layout"
        );

        // One slot per organization: a late task never blocks on send.
        let (tx, mut rx) = mpsc::channel::<PeerEndorsementResponse>(required);
        let shared = Arc::new(proposal.clone());
        for msp_id in target.orgs() {
            let tx = tx.clone();
            let directory = Arc::clone(&self.directory);
            let policy = Arc::clone(&self.policy);
            let proposal = Arc::clone(&shared);
            let channel = channel.to_string();
            let msp_id = msp_id.clone();
            tokio::spawn(async move {
                let outcome =
                    endorse_org(directory.as_ref(), policy.as_ref(), &channel, &msp_id, &proposal)
                        .await;
                if let Some(response) = outcome {
                    let _ = tx.send(response).await;
                }
            });
        }
        drop(tx);

        let mut collected: HashMap<MspId, PeerEndorsementResponse> = HashMap::with_capacity(required);
        while let Some(response) = rx.recv().await {
            collected.entry(response.msp_id.clone()).or_insert(response);
            if collected.len() == required {
                info!(channel = %channel, chaincode = %chaincode, endorsements = required, "Endorsement quorum reached");
                return Ok(in_layout_order(target, collected));
            }
        }

        let failed: HashSet<MspId> = target
            .orgs()
            .iter()
            .filter(|org| !collected.contains_key(*org))
            .cloned()
            .collect();
        warn!(
            channel = %channel,
            chaincode = %chaincode,
            layout = target_index,
            missing = ?failed,
            "Target layout unsatisfied, falling back to alternative layouts"
        );

        self.fallback(
            &layouts,
            target_index,
            collected,
            failed,
            proposal,
            channel,
            chaincode,
        )
        .await
    }

    /// Try the remaining layouts in table order, reusing responses already
    /// collected per organization and skipping layouts that contain an
    /// organization known to have failed in this call.
    #[allow(clippy::too_many_arguments)]
    async fn fallback(
        &self,
        layouts: &[EndorsementLayout],
        target_index: usize,
        mut collected: HashMap<MspId, PeerEndorsementResponse>,
        mut failed: HashSet<MspId>,
        proposal: &SignedProposal,
        channel: &str,
        chaincode: &str,
    ) -> Result<Vec<PeerEndorsementResponse>, EndorsementError> {
        'layouts: for (index, layout) in layouts.iter().enumerate() {
            if index == target_index {
                continue;
            }
            if layout.orgs().iter().any(|org| failed.contains(org)) {
                debug!(layout = index, "Skipping layout with a failed organization");
                continue;
            }

            for msp_id in layout.orgs() {
                if collected.contains_key(msp_id) {
                    continue;
                }
                match endorse_org(
                    self.directory.as_ref(),
                    self.policy.as_ref(),
                    channel,
                    msp_id,
                    proposal,
                )
                .await
                {
                    Some(response) => {
                        collected.insert(msp_id.clone(), response);
                    }
                    None => {
                        failed.insert(msp_id.clone());
                        continue 'layouts;
                    }
                }
            }

            info!(
                channel = %channel,
                chaincode = %chaincode,
                layout = index,
                endorsements = layout.len(),
                "Endorsement quorum reached on fallback layout"
            );
            return Ok(in_layout_order(layout, collected));
        }

        Err(EndorsementError::QuorumNotReached {
            channel: channel.to_string(),
            chaincode: chaincode.to_string(),
            required: layouts[target_index].len(),
            collected: collected.len(),
        })
    }

    async fn collect_single(
        &self,
        proposal: &SignedProposal,
        channel: &str,
        chaincode: &str,
    ) -> Result<Vec<PeerEndorsementResponse>, EndorsementError> {
        let layouts = self.layouts_for(channel, chaincode)?;
        let first = {
            let mut rng = self.rng.lock();
            let layout = &layouts[rng.gen_range(0..layouts.len())];
            layout.orgs()[rng.gen_range(0..layout.len())].clone()
        };

        let mut tried: HashSet<MspId> = HashSet::new();
        let candidates = std::iter::once(&first).chain(layouts.iter().flat_map(|l| l.orgs()));
        for msp_id in candidates {
            if !tried.insert(msp_id.clone()) {
                continue;
            }
            if let Some(response) = endorse_org(
                self.directory.as_ref(),
                self.policy.as_ref(),
                channel,
                msp_id,
                proposal,
            )
            .await
            {
                debug!(channel = %channel, chaincode = %chaincode, peer = %response.peer, "Single endorser answered");
                return Ok(vec![response]);
            }
        }

        warn!(channel = %channel, chaincode = %chaincode, orgs = tried.len(), "No organization had an available peer");
        Err(EndorsementError::NoAvailablePeer {
            channel: channel.to_string(),
            chaincode: chaincode.to_string(),
        })
    }
}

/// Attempt an organization's pool: skip peers that are not ready, move on
/// after a transport failure, stop at the first peer that answers.
async fn endorse_org(
    directory: &dyn PeerDirectory,
    policy: &dyn PeerSelectionPolicy,
    channel: &str,
    msp_id: &str,
    proposal: &SignedProposal,
) -> Option<PeerEndorsementResponse> {
    let peers = policy.order(msp_id, directory.peers(channel, msp_id));
    if peers.is_empty() {
        debug!(channel = %channel, msp = %msp_id, "Organization has no peers on channel");
        return None;
    }

    for peer in peers {
        if !peer.is_ready() {
            debug!(peer = %peer.name(), msp = %msp_id, "Peer not ready, skipping");
            continue;
        }
        match peer.process_proposal(proposal).await {
            Ok(response) => {
                return Some(PeerEndorsementResponse::answered(peer.name(), msp_id, response));
            }
            Err(e) => {
                warn!(peer = %peer.name(), msp = %msp_id, error = %e, "Endorsement call failed, trying next peer");
            }
        }
    }
    None
}

fn in_layout_order(
    layout: &EndorsementLayout,
    mut collected: HashMap<MspId, PeerEndorsementResponse>,
) -> Vec<PeerEndorsementResponse> {
    layout
        .orgs()
        .iter()
        .filter_map(|org| collected.remove(org))
        .collect()
}

#[async_trait]
impl EndorsementApi for EndorsementOrchestrator {
    async fn collect_endorsements(
        &self,
        proposal: &SignedProposal,
        channel: &str,
        chaincode: &str,
        mode: EndorsementMode,
    ) -> Result<Vec<PeerEndorsementResponse>, EndorsementError> {
        let collection = async {
            match mode {
                EndorsementMode::Quorum => self.collect_quorum(proposal, channel, chaincode).await,
                EndorsementMode::Single => self.collect_single(proposal, channel, chaincode).await,
            }
        };

        match self.config.endorsement_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(Duration::from_millis(timeout_ms), collection)
                .await
                .map_err(|_| {
                    warn!(channel = %channel, chaincode = %chaincode, timeout_ms, "Endorsement deadline expired");
                    EndorsementError::Timeout { timeout_ms }
                })?,
            None => collection.await,
        }
    }

    async fn endorse_all(
        &self,
        proposal: &SignedProposal,
        peers: &[Arc<dyn EndorserConnection>],
    ) -> Vec<PeerEndorsementResponse> {
        let calls = peers.iter().map(|peer| async move {
            if !peer.is_ready() {
                return PeerEndorsementResponse::failed(
                    peer.name(),
                    peer.msp_id(),
                    TransportError::NotReady(peer.name().to_string()),
                );
            }
            match peer.process_proposal(proposal).await {
                Ok(response) => PeerEndorsementResponse::answered(peer.name(), peer.msp_id(), response),
                Err(e) => {
                    warn!(peer = %peer.name(), error = %e, "Endorsement call failed");
                    PeerEndorsementResponse::failed(peer.name(), peer.msp_id(), e)
                }
            }
        });
        join_all(calls).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPeerDirectory;
    use crate::config::PeerSelection;
    use crate::ports::MockEndorser;

    // =========================================================================
    // TEST HELPERS
    // =========================================================================

    fn layout(orgs: &[&str]) -> EndorsementLayout {
        EndorsementLayout::new(orgs.iter().map(|o| o.to_string())).unwrap()
    }

    fn proposal() -> SignedProposal {
        SignedProposal {
            proposal_bytes: b"proposal".to_vec(),
            signature: b"sig".to_vec(),
        }
    }

    struct Harness {
        table: Arc<EndorsementGroupTable>,
        directory: Arc<InMemoryPeerDirectory>,
    }

    impl Harness {
        fn new(layouts: Vec<EndorsementLayout>) -> Self {
            let table = Arc::new(EndorsementGroupTable::new());
            table.replace("ch1", "cc1", layouts);
            Self {
                table,
                directory: Arc::new(InMemoryPeerDirectory::new()),
            }
        }

        fn peer(&self, peer: MockEndorser) -> Arc<MockEndorser> {
            let peer = Arc::new(peer);
            self.directory.add_peer("ch1", peer.clone());
            peer
        }

        fn orchestrator(&self, config: OrchestratorConfig) -> EndorsementOrchestrator {
            EndorsementOrchestrator::new(config, self.table.clone(), self.directory.clone())
        }
    }

    fn orgs_of(responses: &[PeerEndorsementResponse]) -> Vec<String> {
        responses.iter().map(|r| r.msp_id.clone()).collect()
    }

    // =========================================================================
    // QUORUM MODE
    // =========================================================================

    #[tokio::test]
    async fn test_quorum_one_response_per_org() {
        let h = Harness::new(vec![layout(&["OrgA", "OrgB"])]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
        h.peer(MockEndorser::ok("b0", "OrgB", b"P".to_vec()));

        let responses = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap();

        assert_eq!(orgs_of(&responses), vec!["OrgA", "OrgB"]);
        assert!(responses.iter().all(|r| r.result.is_ok()));
    }

    #[tokio::test]
    async fn test_quorum_returns_n_for_any_layout_size() {
        for n in 1..=5 {
            let names: Vec<String> = (0..n).map(|i| format!("Org{}", i)).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let h = Harness::new(vec![layout(&refs)]);
            for name in &names {
                h.peer(MockEndorser::ok(&format!("{}-p0", name), name, b"P".to_vec()));
            }

            let responses = h
                .orchestrator(OrchestratorConfig::default())
                .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
                .await
                .unwrap();

            let unique: HashSet<String> = orgs_of(&responses).into_iter().collect();
            assert_eq!(responses.len(), n);
            assert_eq!(unique.len(), n);
        }
    }

    #[tokio::test]
    async fn test_quorum_fails_when_org_pool_empty() {
        let h = Harness::new(vec![layout(&["OrgA", "OrgB"])]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));

        let err = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EndorsementError::QuorumNotReached {
                channel: "ch1".to_string(),
                chaincode: "cc1".to_string(),
                required: 2,
                collected: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_quorum_falls_back_to_alternative_layout() {
        // Whichever layout is drawn first, only {OrgA, OrgC} can be satisfied.
        for seed in 0..8 {
            let h = Harness::new(vec![layout(&["OrgA", "OrgB"]), layout(&["OrgA", "OrgC"])]);
            let a = h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
            h.peer(MockEndorser::ok("b0", "OrgB", b"P".to_vec()).not_ready());
            h.peer(MockEndorser::ok("c0", "OrgC", b"P".to_vec()));

            let config = OrchestratorConfig {
                layout_seed: Some(seed),
                ..OrchestratorConfig::default()
            };
            let responses = h
                .orchestrator(config)
                .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
                .await
                .unwrap();

            assert_eq!(orgs_of(&responses), vec!["OrgA", "OrgC"]);
            // Shared organization is endorsed once, not once per layout.
            assert_eq!(a.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_quorum_skips_layouts_with_failed_org() {
        let h = Harness::new(vec![
            layout(&["OrgA", "OrgB"]),
            layout(&["OrgB", "OrgC"]),
            layout(&["OrgC"]),
        ]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
        h.peer(MockEndorser::ok("c0", "OrgC", b"P".to_vec()));

        let config = OrchestratorConfig {
            layout_seed: Some(3),
            ..OrchestratorConfig::default()
        };
        let responses = h
            .orchestrator(config)
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap();
        assert_eq!(orgs_of(&responses), vec!["OrgC"]);
    }

    #[tokio::test]
    async fn test_unready_peer_skipped_within_org() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        let a0 = h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()).not_ready());
        h.peer(MockEndorser::ok("a1", "OrgA", b"P".to_vec()));

        let responses = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap();

        assert_eq!(responses[0].peer, "a1");
        assert_eq!(a0.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_tries_next_peer() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        h.peer(MockEndorser::failing("a0", "OrgA"));
        h.peer(MockEndorser::ok("a1", "OrgA", b"P".to_vec()));

        let responses = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap();
        assert_eq!(responses[0].peer, "a1");
    }

    #[tokio::test]
    async fn test_application_error_stops_at_first_peer() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        h.peer(MockEndorser::with_status("a0", "OrgA", 500, "chaincode panic", vec![]));
        let a1 = h.peer(MockEndorser::ok("a1", "OrgA", b"P".to_vec()));

        let responses = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap();

        assert_eq!(responses[0].peer, "a0");
        assert_eq!(responses[0].response().map(|r| r.status()), Some(500));
        assert_eq!(a1.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_chaincode() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        let err = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "missing", EndorsementMode::Quorum)
            .await
            .unwrap_err();
        assert!(matches!(err, EndorsementError::UnknownChaincode { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_abandons_slow_peer() {
        let h = Harness::new(vec![layout(&["OrgA", "OrgB"])]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
        let slow = h.peer(MockEndorser::ok("b0", "OrgB", b"P".to_vec()).with_delay(Duration::from_secs(60)));

        let config = OrchestratorConfig {
            endorsement_timeout_ms: Some(100),
            ..OrchestratorConfig::for_testing()
        };
        let err = h
            .orchestrator(config)
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
            .await
            .unwrap_err();
        assert_eq!(err, EndorsementError::Timeout { timeout_ms: 100 });

        // The abandoned task finishes later and drops its result quietly.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_round_robin_spreads_load() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        let a0 = h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
        let a1 = h.peer(MockEndorser::ok("a1", "OrgA", b"P".to_vec()));

        let config = OrchestratorConfig {
            peer_selection: PeerSelection::RoundRobin,
            ..OrchestratorConfig::for_testing()
        };
        let orchestrator = h.orchestrator(config);
        for _ in 0..4 {
            orchestrator
                .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Quorum)
                .await
                .unwrap();
        }
        assert_eq!(a0.calls(), 2);
        assert_eq!(a1.calls(), 2);
    }

    // =========================================================================
    // SINGLE-ENDORSER MODE
    // =========================================================================

    #[tokio::test]
    async fn test_single_returns_exactly_one() {
        let h = Harness::new(vec![layout(&["OrgA", "OrgB"])]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()));
        h.peer(MockEndorser::ok("b0", "OrgB", b"P".to_vec()));

        let responses = h
            .orchestrator(OrchestratorConfig::default())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Single)
            .await
            .unwrap();
        assert_eq!(responses.len(), 1);
    }

    #[tokio::test]
    async fn test_single_scans_other_orgs() {
        for seed in 0..8 {
            let h = Harness::new(vec![layout(&["OrgA", "OrgB"]), layout(&["OrgC"])]);
            h.peer(MockEndorser::failing("a0", "OrgA"));
            h.peer(MockEndorser::ok("c0", "OrgC", b"P".to_vec()));

            let config = OrchestratorConfig {
                layout_seed: Some(seed),
                ..OrchestratorConfig::default()
            };
            let responses = h
                .orchestrator(config)
                .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Single)
                .await
                .unwrap();
            assert_eq!(responses[0].peer, "c0");
        }
    }

    #[tokio::test]
    async fn test_single_no_available_peer() {
        let h = Harness::new(vec![layout(&["OrgA"]), layout(&["OrgB"])]);
        h.peer(MockEndorser::ok("a0", "OrgA", b"P".to_vec()).not_ready());

        let err = h
            .orchestrator(OrchestratorConfig::for_testing())
            .collect_endorsements(&proposal(), "ch1", "cc1", EndorsementMode::Single)
            .await
            .unwrap_err();
        assert!(matches!(err, EndorsementError::NoAvailablePeer { .. }));
    }

    // =========================================================================
    // EXPLICIT FAN-OUT
    // =========================================================================

    #[tokio::test]
    async fn test_endorse_all_reports_every_peer() {
        let h = Harness::new(vec![layout(&["OrgA"])]);
        let peers: Vec<Arc<dyn EndorserConnection>> = vec![
            Arc::new(MockEndorser::ok("a0", "OrgA", b"P".to_vec())),
            Arc::new(MockEndorser::ok("a1", "OrgA", b"P".to_vec()).not_ready()),
            Arc::new(MockEndorser::failing("b0", "OrgB")),
        ];

        let responses = h
            .orchestrator(OrchestratorConfig::for_testing())
            .endorse_all(&proposal(), &peers)
            .await;

        assert_eq!(responses.len(), 3);
        assert!(responses[0].result.is_ok());
        assert_eq!(responses[1].result, Err(TransportError::NotReady("a1".to_string())));
        assert!(matches!(responses[2].result, Err(TransportError::Rpc(_))));
        assert_eq!(responses[2].msp_id, "OrgB");
    }
}
