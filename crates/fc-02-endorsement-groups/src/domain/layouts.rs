//! Descriptor-to-layout resolution and chaincode interest parsing.

use std::collections::BTreeMap;

use shared_types::MspId;
use tracing::{debug, warn};

use super::{ChaincodeInterest, DiscoveryError, EndorsementDescriptor, EndorsementLayout};

/// Resolve a descriptor's layouts into organization lists.
///
/// Each group code maps to the organization of the peers listed under it.
/// Groups with a required count of zero are ignored; a layout naming a group
/// with no known organization cannot be satisfied and is dropped. A required
/// count above one still means one endorsement from that organization.
pub fn resolve_layouts(
    channel: &str,
    descriptor: &EndorsementDescriptor,
) -> Result<Vec<EndorsementLayout>, DiscoveryError> {
    let group_orgs: BTreeMap<&str, &MspId> = descriptor
        .endorsers_by_group
        .iter()
        .filter_map(|(group, endorsers)| {
            endorsers
                .first()
                .map(|endorser| (group.as_str(), &endorser.msp_id))
        })
        .collect();

    let mut layouts = Vec::with_capacity(descriptor.layouts.len());
    'layouts: for (index, layout) in descriptor.layouts.iter().enumerate() {
        let mut orgs = Vec::with_capacity(layout.quantities_by_group.len());
        for (group, quantity) in &layout.quantities_by_group {
            if *quantity == 0 {
                continue;
            }
            match group_orgs.get(group.as_str()) {
                Some(org) => orgs.push((*org).clone()),
                None => {
                    warn!(
                        channel = %channel,
                        chaincode = %descriptor.chaincode,
                        layout = index,
                        group = %group,
                        "Layout references a group with no peers, skipping"
                    );
                    continue 'layouts;
                }
            }
        }
        if let Some(resolved) = EndorsementLayout::new(orgs) {
            layouts.push(resolved);
        }
    }

    debug!(
        channel = %channel,
        chaincode = %descriptor.chaincode,
        layouts = layouts.len(),
        "Resolved endorsement layouts"
    );

    if layouts.is_empty() {
        return Err(DiscoveryError::NoLayouts {
            channel: channel.to_string(),
            chaincode: descriptor.chaincode.clone(),
        });
    }
    Ok(layouts)
}

/// Combine requested chaincodes with their configured collections.
///
/// `collections` maps a chaincode to a comma-separated collection list; every
/// chaincode it names must also be requested.
pub fn parse_interests(
    chaincodes: &[String],
    collections: &BTreeMap<String, String>,
) -> Result<Vec<ChaincodeInterest>, DiscoveryError> {
    if let Some(unknown) = collections.keys().find(|cc| !chaincodes.contains(*cc)) {
        return Err(DiscoveryError::UnknownCollection {
            chaincode: unknown.clone(),
        });
    }

    Ok(chaincodes
        .iter()
        .map(|chaincode| ChaincodeInterest {
            chaincode: chaincode.clone(),
            collections: collections
                .get(chaincode)
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect())
}
