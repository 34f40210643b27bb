//! # FC-03 Endorsement Orchestrator
//!
//! Sends a signed proposal to the peers of one endorsement layout and
//! collects exactly one response per organization, falling back to the
//! other layouts when an organization cannot answer.
//!
//! **Component:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Modes
//!
//! | Mode | Used for | Contract |
//! |------|----------|----------|
//! | `Quorum` | state-changing invoke | one response per org of a fully satisfied layout |
//! | `Single` | read-only query | exactly one response from any reachable org |
//! | `endorse_all` | admin calls | one result per listed peer, errors included |
//!
//! ## Concurrency
//!
//! Quorum mode spawns one task per organization of the target layout. Each
//! task owns a slot in a result channel sized to the layout, so a task that
//! finishes after the orchestrator returned drops its result instead of
//! blocking.
//!
//! ## Module Structure
//!
//! ```text
//! fc-03-endorsement/
//! ├── domain/          # Responses, errors, peer-selection policies
//! ├── ports/           # EndorsementApi (inbound), EndorserConnection/PeerDirectory/PeerConnector (outbound)
//! ├── adapters/        # InMemoryPeerDirectory
//! ├── application/     # EndorsementOrchestrator
//! └── config.rs        # OrchestratorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryPeerDirectory;
pub use application::EndorsementOrchestrator;
pub use config::{OrchestratorConfig, PeerSelection};
pub use domain::{
    policy_for, EndorsementError, EndorsementMode, FirstReady, PeerEndorsementResponse,
    PeerSelectionPolicy, RandomOrder, RoundRobin,
};
pub use ports::{
    EndorsementApi, EndorserConnection, MockEndorser, MockPeerConnector, PeerConnector,
    PeerDirectory,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
