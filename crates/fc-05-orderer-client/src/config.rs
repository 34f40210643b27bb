//! # Orderer Client Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default bound on one deliver exchange.
pub const DEFAULT_DELIVER_TIMEOUT_SECS: u64 = 5;

/// Orderer client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrdererClientConfig {
    /// Wall-clock bound on one deliver call, in seconds.
    pub deliver_timeout_secs: u64,
}

impl Default for OrdererClientConfig {
    fn default() -> Self {
        Self {
            deliver_timeout_secs: DEFAULT_DELIVER_TIMEOUT_SECS,
        }
    }
}

impl OrdererClientConfig {
    /// Create a config for testing (short deadline).
    pub fn for_testing() -> Self {
        Self {
            deliver_timeout_secs: 1,
        }
    }

    /// Deliver deadline as a duration.
    pub fn deliver_timeout(&self) -> Duration {
        Duration::from_secs(self.deliver_timeout_secs)
    }
}
