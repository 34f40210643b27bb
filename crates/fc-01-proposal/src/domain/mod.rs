//! # Domain Module
//!
//! Pure proposal-construction logic.

pub mod errors;
pub mod headers;
pub mod identity;

pub use errors::*;
pub use headers::*;
pub use identity::*;
