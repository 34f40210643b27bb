//! Channel and signature headers.

use std::time::SystemTime;

use prost::Message;
use shared_types::protos::common::{ChannelHeader, Header, HeaderType, SignatureHeader};
use shared_types::protos::peer::{ChaincodeHeaderExtension, ChaincodeId};
use shared_types::TransactionId;

/// Version stamped into every channel header.
pub const CHANNEL_HEADER_VERSION: i32 = 1;

/// Channel header for `header_type`, stamped with the current time.
///
/// When `chaincode` is given, the extension names it so peers can route the
/// proposal before decoding the payload.
pub fn build_channel_header(
    header_type: HeaderType,
    channel_id: &str,
    tx_id: &TransactionId,
    chaincode: Option<&str>,
) -> ChannelHeader {
    let extension = chaincode
        .map(|name| {
            ChaincodeHeaderExtension {
                chaincode_id: Some(ChaincodeId {
                    name: name.to_string(),
                    ..Default::default()
                }),
            }
            .encode_to_vec()
        })
        .unwrap_or_default();

    ChannelHeader {
        r#type: header_type as i32,
        version: CHANNEL_HEADER_VERSION,
        timestamp: Some(SystemTime::now().into()),
        channel_id: channel_id.to_string(),
        tx_id: tx_id.as_str().to_string(),
        epoch: 0,
        extension,
        tls_cert_hash: Vec::new(),
    }
}

/// Signature header carrying the creator and the transaction nonce.
pub fn build_signature_header(tx_id: &TransactionId) -> SignatureHeader {
    SignatureHeader {
        creator: tx_id.creator().to_vec(),
        nonce: tx_id.nonce().to_vec(),
    }
}

/// Marshal both headers into a common header.
pub fn build_header(channel_header: &ChannelHeader, signature_header: &SignatureHeader) -> Header {
    Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    }
}
