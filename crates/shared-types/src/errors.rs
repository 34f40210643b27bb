//! # Error Types
//!
//! Errors shared by the peer and orderer transport ports.

use thiserror::Error;

/// Failure reported by a peer or orderer transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection exists but is not in a ready state.
    #[error("Connection not ready: {0}")]
    NotReady(String),

    /// The RPC itself failed (dial, deadline, reset, remote error).
    #[error("RPC failed: {0}")]
    Rpc(String),

    /// The remote end closed a stream unexpectedly.
    #[error("Stream closed by remote")]
    StreamClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_message() {
        let err = TransportError::Rpc("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
