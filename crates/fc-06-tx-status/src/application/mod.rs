//! # Application Layer
//!
//! Registry and waiter handles.

pub mod registry;

pub use registry::{TxStatusRegistry, TxStatusWaiter};
