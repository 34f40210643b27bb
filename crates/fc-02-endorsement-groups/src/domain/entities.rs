//! # Domain Entities
//!
//! Raw discovery output and the resolved layouts derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::MspId;

/// One endorsing peer as reported by discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorser {
    /// Organization the peer belongs to.
    pub msp_id: MspId,
    /// `host:port` the peer listens on.
    pub endpoint: String,
    /// Ledger height the peer reported.
    pub ledger_height: u64,
    /// Serialized peer identity.
    pub identity: String,
}

/// How many endorsements each group must contribute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Group code -> required count.
    pub quantities_by_group: BTreeMap<String, u32>,
}

/// Discovery's answer for one chaincode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementDescriptor {
    /// Chaincode this descriptor covers.
    pub chaincode: String,
    /// Candidate peers keyed by discovery's internal group code.
    pub endorsers_by_group: BTreeMap<String, Vec<Endorser>>,
    /// Alternative ways to satisfy the policy.
    pub layouts: Vec<Layout>,
}

/// Chaincode plus the private-data collections the caller will touch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInterest {
    /// Chaincode name.
    pub chaincode: String,
    /// Collection names, empty when none.
    pub collections: Vec<String>,
}

/// A peer listed by channel membership discovery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPeer {
    /// Organization the peer belongs to.
    pub msp_id: MspId,
    /// `host:port` of the peer.
    pub endpoint: String,
    /// Ledger height the peer reported.
    pub ledger_height: u64,
    /// Chaincodes installed on the peer.
    pub chaincodes: Vec<String>,
}

/// Connection parameters for a discovered endorsing peer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerEndpoint {
    /// Channel the peer was discovered on.
    pub channel_id: String,
    /// Organization the peer belongs to.
    pub msp_id: MspId,
    /// `host:port` of the peer.
    pub address: String,
    /// TLS roots of the peer's organization.
    pub tls_root_certs: Vec<Vec<u8>>,
}

/// One AND-combination of organizations that satisfies a policy.
///
/// The organization list is never empty and holds no duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementLayout {
    orgs: Vec<MspId>,
}

impl EndorsementLayout {
    /// Build a layout, dropping duplicate organizations while keeping order.
    ///
    /// Returns `None` for an empty list.
    pub fn new(orgs: impl IntoIterator<Item = MspId>) -> Option<Self> {
        let mut unique: Vec<MspId> = Vec::new();
        for org in orgs {
            if !unique.contains(&org) {
                unique.push(org);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self { orgs: unique })
        }
    }

    /// Organizations in this layout.
    pub fn orgs(&self) -> &[MspId] {
        &self.orgs
    }

    /// Number of organizations that must endorse.
    pub fn len(&self) -> usize {
        self.orgs.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.orgs.is_empty()
    }

    /// True if `msp_id` is part of this layout.
    pub fn contains(&self, msp_id: &str) -> bool {
        self.orgs.iter().any(|org| org == msp_id)
    }
}

/// Result of resolving one channel's discovery answers.
///
/// Nothing reaches the group table until the result is committed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedChannel {
    /// Channel resolved.
    pub channel_id: String,
    /// Endorsing peers per organization, for the connection layer to dial.
    pub peers: BTreeMap<MspId, Vec<PeerEndpoint>>,
    /// Resolved layouts per chaincode.
    pub layouts: BTreeMap<String, Vec<EndorsementLayout>>,
}

impl ResolvedChannel {
    /// Chaincodes covered by this result.
    pub fn chaincodes(&self) -> Vec<String> {
        self.layouts.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rejects_empty() {
        assert!(EndorsementLayout::new(Vec::new()).is_none());
    }

    #[test]
    fn test_layout_dedups_orgs() {
        let layout = EndorsementLayout::new(vec![
            "OrgA".to_string(),
            "OrgB".to_string(),
            "OrgA".to_string(),
        ])
        .unwrap();
        assert_eq!(layout.orgs(), &["OrgA".to_string(), "OrgB".to_string()]);
        assert_eq!(layout.len(), 2);
        assert!(layout.contains("OrgB"));
        assert!(!layout.contains("OrgC"));
    }
}
