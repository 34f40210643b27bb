//! # Domain Module
//!
//! Status events and their decoding from committed blocks.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
