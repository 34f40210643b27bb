//! # Domain Module
//!
//! Endorsement responses, errors and peer-selection policies.

pub mod entities;
pub mod errors;
pub mod selection;

pub use entities::*;
pub use errors::*;
pub use selection::*;
