//! # Integration Flows

pub mod commit_flow;
pub mod orderer_failover;
pub mod status_registry;
