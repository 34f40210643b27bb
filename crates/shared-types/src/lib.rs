//! # Shared Types Crate
//!
//! Value types and protobuf wire messages shared by every component of the
//! commit client.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every message that crosses a crate boundary
//!   is defined here, once.
//! - **Wire Compatibility**: `protos` mirrors the upstream message layout tag
//!   for tag; encoding goes through `prost`.
//! - **Caller-Owned Identity**: `Identity` is passed by value into operations
//!   and never mutated by the client.

pub mod entities;
pub mod errors;
pub mod protos;

pub use entities::*;
pub use errors::*;
