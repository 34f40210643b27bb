//! # Domain Module
//!
//! Pure assembly logic: no I/O, no signing.

pub mod assembly;
pub mod errors;
pub mod validation;

pub use assembly::*;
pub use errors::*;
pub use validation::*;
