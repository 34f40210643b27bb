//! Channel configuration as seen by discovery, and the orderer endpoints
//! derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::MspId;
use tracing::debug;

use super::DiscoveryError;

/// A host and port pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// TLS material of one organization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspInfo {
    /// PEM root certificates for TLS.
    pub tls_root_certs: Vec<Vec<u8>>,
}

/// Channel configuration returned by discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Organizations on the channel.
    pub msps: BTreeMap<MspId, MspInfo>,
    /// Orderer endpoints per orderer organization.
    pub orderers: BTreeMap<MspId, Vec<Endpoint>>,
}

impl ChannelConfig {
    /// TLS roots for an organization, empty if unknown.
    pub fn tls_roots(&self, msp_id: &str) -> Vec<Vec<u8>> {
        self.msps
            .get(msp_id)
            .map(|info| info.tls_root_certs.clone())
            .unwrap_or_default()
    }
}

/// A named orderer the connection layer should dial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererEndpoint {
    /// `"{org}-{index}"`.
    pub name: String,
    /// `host:port`.
    pub address: String,
    /// TLS roots of the orderer organization.
    pub tls_root_certs: Vec<Vec<u8>>,
}

/// Flatten a channel config into an ordered orderer list.
///
/// Order is organization name, then endpoint position, which is also the
/// broadcast failover order.
pub fn orderer_endpoints(
    channel: &str,
    config: &ChannelConfig,
) -> Result<Vec<OrdererEndpoint>, DiscoveryError> {
    let mut endpoints = Vec::new();
    for (org, points) in &config.orderers {
        debug!(org = %org, count = points.len(), "Orderer organization endpoints");
        let tls_root_certs = config.tls_roots(org);
        for (index, point) in points.iter().enumerate() {
            endpoints.push(OrdererEndpoint {
                name: format!("{}-{}", org, index),
                address: format!("{}:{}", point.host, point.port),
                tls_root_certs: tls_root_certs.clone(),
            });
        }
    }

    if endpoints.is_empty() {
        return Err(DiscoveryError::NoOrderers {
            channel: channel.to_string(),
        });
    }
    Ok(endpoints)
}
