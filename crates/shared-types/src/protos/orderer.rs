//! Messages from the `orderer` package: broadcast and deliver.

use super::common::{Block, Status};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeekNewest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeekOldest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeekSpecified {
    #[prost(uint64, tag = "1")]
    pub number: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeekPosition {
    #[prost(oneof = "seek_position::Type", tags = "1, 2, 3")]
    pub r#type: Option<seek_position::Type>,
}

/// Nested types for [`SeekPosition`].
pub mod seek_position {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "1")]
        Newest(super::SeekNewest),
        #[prost(message, tag = "2")]
        Oldest(super::SeekOldest),
        #[prost(message, tag = "3")]
        Specified(super::SeekSpecified),
    }
}

impl SeekPosition {
    /// Position at a specific block number.
    pub fn specified(number: u64) -> Self {
        Self {
            r#type: Some(seek_position::Type::Specified(SeekSpecified { number })),
        }
    }

    /// Position at the newest block.
    pub fn newest() -> Self {
        Self {
            r#type: Some(seek_position::Type::Newest(SeekNewest {})),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SeekInfo {
    #[prost(message, optional, tag = "1")]
    pub start: Option<SeekPosition>,
    #[prost(message, optional, tag = "2")]
    pub stop: Option<SeekPosition>,
    #[prost(enumeration = "seek_info::SeekBehavior", tag = "3")]
    pub behavior: i32,
}

/// Nested types for [`SeekInfo`].
pub mod seek_info {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum SeekBehavior {
        BlockUntilReady = 0,
        FailIfNotReady = 1,
    }
}

impl SeekInfo {
    /// Seek the inclusive range `[start, stop]`, waiting for blocks to exist.
    pub fn range(start: u64, stop: u64) -> Self {
        Self {
            start: Some(SeekPosition::specified(start)),
            stop: Some(SeekPosition::specified(stop)),
            behavior: seek_info::SeekBehavior::BlockUntilReady as i32,
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BroadcastResponse {
    #[prost(enumeration = "Status", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub info: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeliverResponse {
    #[prost(oneof = "deliver_response::Type", tags = "1, 2")]
    pub r#type: Option<deliver_response::Type>,
}

/// Nested types for [`DeliverResponse`].
pub mod deliver_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Type {
        #[prost(enumeration = "super::Status", tag = "1")]
        Status(i32),
        #[prost(message, tag = "2")]
        Block(super::Block),
    }
}

impl DeliverResponse {
    /// A terminal status message.
    pub fn status(status: Status) -> Self {
        Self {
            r#type: Some(deliver_response::Type::Status(status as i32)),
        }
    }

    /// A block message.
    pub fn block(block: Block) -> Self {
        Self {
            r#type: Some(deliver_response::Type::Block(block)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_genesis_seek_range() {
        let info = SeekInfo::range(0, 0);
        let decoded = SeekInfo::decode(info.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.start, Some(SeekPosition::specified(0)));
        assert_eq!(decoded.behavior(), seek_info::SeekBehavior::BlockUntilReady);
    }

    #[test]
    fn test_broadcast_status_accessor() {
        let resp = BroadcastResponse {
            status: Status::ServiceUnavailable as i32,
            info: String::new(),
        };
        assert_eq!(resp.status(), Status::ServiceUnavailable);
    }
}
