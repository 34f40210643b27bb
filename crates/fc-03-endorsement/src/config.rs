//! # Orchestrator Configuration

use serde::{Deserialize, Serialize};

/// Order in which a pool's peers are attempted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerSelection {
    /// Pool order; the first ready peer wins.
    #[default]
    FirstReady,
    /// Rotate the starting peer on every call.
    RoundRobin,
    /// Shuffle the pool on every call.
    Random,
}

impl std::str::FromStr for PeerSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_ready" => Ok(Self::FirstReady),
            "round_robin" => Ok(Self::RoundRobin),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown peer selection: {}", other)),
        }
    }
}

/// Endorsement orchestrator configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Peer ordering within an organization.
    pub peer_selection: PeerSelection,

    /// Seed for layout/org selection. `None` seeds from OS entropy once.
    pub layout_seed: Option<u64>,

    /// Deadline for one whole collection, in milliseconds. `None` means
    /// unbounded.
    pub endorsement_timeout_ms: Option<u64>,
}

impl OrchestratorConfig {
    /// Create a config for testing (deterministic, bounded).
    pub fn for_testing() -> Self {
        Self {
            peer_selection: PeerSelection::FirstReady,
            layout_seed: Some(7),
            endorsement_timeout_ms: Some(5_000),
        }
    }
}
