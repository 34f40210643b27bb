//! # Domain Module
//!
//! Discovery descriptors, endorsement layouts and the group table.

pub mod config;
pub mod entities;
pub mod errors;
pub mod layouts;
pub mod table;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use layouts::*;
pub use table::*;
