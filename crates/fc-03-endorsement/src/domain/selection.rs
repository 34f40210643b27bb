//! # Peer Selection Policies
//!
//! Decide the order in which an organization's peers are attempted. The
//! orchestrator still skips peers that are not ready and stops at the first
//! peer that answers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::PeerSelection;
use crate::ports::EndorserConnection;

/// Pool ordering strategy.
pub trait PeerSelectionPolicy: Send + Sync {
    /// Reorder `peers` of organization `msp_id` for one attempt.
    fn order(
        &self,
        msp_id: &str,
        peers: Vec<Arc<dyn EndorserConnection>>,
    ) -> Vec<Arc<dyn EndorserConnection>>;

    /// Policy name for logs.
    fn name(&self) -> &'static str;
}

/// Keep pool order.
#[derive(Debug, Default)]
pub struct FirstReady;

impl PeerSelectionPolicy for FirstReady {
    fn order(
        &self,
        _msp_id: &str,
        peers: Vec<Arc<dyn EndorserConnection>>,
    ) -> Vec<Arc<dyn EndorserConnection>> {
        peers
    }

    fn name(&self) -> &'static str {
        "first_ready"
    }
}

/// Rotate the starting peer per organization.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursors: Mutex<HashMap<String, usize>>,
}

impl PeerSelectionPolicy for RoundRobin {
    fn order(
        &self,
        msp_id: &str,
        mut peers: Vec<Arc<dyn EndorserConnection>>,
    ) -> Vec<Arc<dyn EndorserConnection>> {
        if peers.is_empty() {
            return peers;
        }
        let start = {
            let mut cursors = self.cursors.lock();
            let cursor = cursors.entry(msp_id.to_string()).or_insert(0);
            let start = *cursor % peers.len();
            *cursor = cursor.wrapping_add(1);
            start
        };
        peers.rotate_left(start);
        peers
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

/// Shuffle the pool with a PRNG seeded once.
pub struct RandomOrder {
    rng: Mutex<StdRng>,
}

impl RandomOrder {
    /// Seed from `seed`, or from OS entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl PeerSelectionPolicy for RandomOrder {
    fn order(
        &self,
        _msp_id: &str,
        mut peers: Vec<Arc<dyn EndorserConnection>>,
    ) -> Vec<Arc<dyn EndorserConnection>> {
        peers.shuffle(&mut *self.rng.lock());
        peers
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Build the policy named by configuration.
pub fn policy_for(selection: PeerSelection, seed: Option<u64>) -> Arc<dyn PeerSelectionPolicy> {
    match selection {
        PeerSelection::FirstReady => Arc::new(FirstReady),
        PeerSelection::RoundRobin => Arc::new(RoundRobin::default()),
        PeerSelection::Random => Arc::new(RandomOrder::new(seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockEndorser;

    fn pool() -> Vec<Arc<dyn EndorserConnection>> {
        ["p0", "p1", "p2"]
            .iter()
            .map(|name| Arc::new(MockEndorser::ok(name, "OrgA", b"P".to_vec())) as Arc<dyn EndorserConnection>)
            .collect()
    }

    fn names(peers: &[Arc<dyn EndorserConnection>]) -> Vec<String> {
        peers.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn test_first_ready_keeps_order() {
        assert_eq!(names(&FirstReady.order("OrgA", pool())), vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_round_robin_rotates_per_org() {
        let policy = RoundRobin::default();
        assert_eq!(names(&policy.order("OrgA", pool()))[0], "p0");
        assert_eq!(names(&policy.order("OrgA", pool()))[0], "p1");
        assert_eq!(names(&policy.order("OrgB", pool()))[0], "p0");
        assert_eq!(names(&policy.order("OrgA", pool()))[0], "p2");
        assert_eq!(names(&policy.order("OrgA", pool()))[0], "p0");
    }

    #[test]
    fn test_random_order_is_permutation() {
        let policy = RandomOrder::new(Some(42));
        let mut ordered = names(&policy.order("OrgA", pool()));
        ordered.sort();
        assert_eq!(ordered, vec!["p0", "p1", "p2"]);
    }

    #[test]
    fn test_policy_for_names() {
        assert_eq!(policy_for(PeerSelection::RoundRobin, None).name(), "round_robin");
        assert_eq!(policy_for(PeerSelection::Random, Some(1)).name(), "random");
    }
}
