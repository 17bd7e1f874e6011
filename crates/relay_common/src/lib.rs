//! Shared primitives for the Relay synthesis toolchain.
//!
//! Contains the internal result/error types used by analysis APIs and the
//! hashing helpers used for candidate bucketing in optimization passes.

#![warn(missing_docs)]

mod hash;
mod result;

pub use hash::{hash_id_set, SetHash};
pub use result::{InternalError, RelayResult};
