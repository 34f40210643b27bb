//! # Domain Module
//!
//! Deliver-stream folding and orderer errors.

pub mod deliver;
pub mod errors;

pub use deliver::*;
pub use errors::*;
