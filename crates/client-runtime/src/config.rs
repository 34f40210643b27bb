//! # Client Configuration
//!
//! Unified configuration for all components plus runtime parameters.
//!
//! Values come from `Default`, optionally deserialized from any serde
//! source, then overridden by `FC_*` environment variables.

use std::collections::BTreeMap;
use std::time::Duration;

use fc_03_endorsement::{OrchestratorConfig, PeerSelection};
use fc_05_orderer_client::OrdererClientConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ClientError;

/// Complete client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Channel -> chaincodes resolved on refresh.
    pub channels: BTreeMap<String, Vec<String>>,
    /// Chaincode -> comma-separated private data collections.
    pub collections: BTreeMap<String, String>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Endorsement orchestrator settings.
    pub orchestrator: OrchestratorConfig,
    /// Orderer client settings.
    pub orderer: OrdererClientConfig,
    /// How long `invoke_and_wait` waits for a commit status, in seconds.
    pub wait_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            channels: BTreeMap::new(),
            collections: BTreeMap::new(),
            log_level: "info".to_string(),
            orchestrator: OrchestratorConfig::default(),
            orderer: OrdererClientConfig::default(),
            wait_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Create a config for testing (deterministic, short deadlines).
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            orchestrator: OrchestratorConfig::for_testing(),
            orderer: OrdererClientConfig::for_testing(),
            wait_timeout_secs: 2,
            ..Self::default()
        }
    }

    /// Defaults with `FC_*` environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `FC_*` overrides read through `lookup`.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("FC_DELIVER_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.orderer.deliver_timeout_secs = secs,
                Err(_) => warn!(value = %value, "FC_DELIVER_TIMEOUT_SECS must be an integer"),
            }
        }
        if let Some(value) = lookup("FC_ENDORSEMENT_TIMEOUT_MS") {
            match value.parse() {
                Ok(ms) => self.orchestrator.endorsement_timeout_ms = Some(ms),
                Err(_) => warn!(value = %value, "FC_ENDORSEMENT_TIMEOUT_MS must be an integer"),
            }
        }
        if let Some(value) = lookup("FC_PEER_SELECTION") {
            match value.parse::<PeerSelection>() {
                Ok(selection) => self.orchestrator.peer_selection = selection,
                Err(e) => warn!(error = %e, "Ignoring FC_PEER_SELECTION"),
            }
        }
        if let Some(value) = lookup("FC_LAYOUT_SEED") {
            match value.parse() {
                Ok(seed) => self.orchestrator.layout_seed = Some(seed),
                Err(_) => warn!(value = %value, "FC_LAYOUT_SEED must be an integer"),
            }
        }
        if let Some(value) = lookup("FC_LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = lookup("FC_WAIT_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => {
                    self.wait_timeout_secs = secs;
                    info!(secs, "Loaded commit wait timeout from environment");
                }
                Err(_) => warn!(value = %value, "FC_WAIT_TIMEOUT_SECS must be an integer"),
            }
        }
    }

    /// Reject settings that would make every call fail.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.orderer.deliver_timeout_secs == 0 {
            return Err(ClientError::Config("deliver timeout must be positive".to_string()));
        }
        if self.wait_timeout_secs == 0 {
            return Err(ClientError::Config("wait timeout must be positive".to_string()));
        }
        if self.orchestrator.endorsement_timeout_ms == Some(0) {
            return Err(ClientError::Config("endorsement timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Commit wait deadline.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Chaincodes configured for `channel`.
    pub fn chaincodes(&self, channel: &str) -> Option<&[String]> {
        self.channels.get(channel).map(Vec::as_slice)
    }

    /// Collection entries relevant to a refresh of `channel`.
    ///
    /// Entries for chaincodes of other configured channels are left out;
    /// entries naming a chaincode no channel lists are kept so the refresh
    /// reports them.
    pub fn collections_for(&self, channel: &str) -> BTreeMap<String, String> {
        let own = self.chaincodes(channel).unwrap_or_default();
        self.collections
            .iter()
            .filter(|(chaincode, _)| {
                own.contains(*chaincode) || !self.channels.values().any(|ccs| ccs.contains(*chaincode))
            })
            .map(|(chaincode, list)| (chaincode.clone(), list.clone()))
            .collect()
    }
}
