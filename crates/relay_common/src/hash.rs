//! XXH3 hashing of gate-id collections.
//!
//! Optimization passes bucket gates by the hash of their source sets before
//! doing pairwise comparisons; hashing an ordered id sequence with XXH3 keeps
//! that pre-pass cheap and deterministic across runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 64-bit XXH3 hash over an ordered sequence of gate ids.
///
/// Two equal id sequences always produce the same `SetHash`. Collisions are
/// possible, so a matching hash only nominates a candidate pair; callers must
/// compare the underlying sets before acting.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetHash(u64);

impl SetHash {
    /// Returns the raw hash value.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetHash({:016x})", self.0)
    }
}

/// Hashes an ordered sequence of ids with XXH3-64.
///
/// The caller is responsible for a canonical order (e.g. iterating a
/// `BTreeSet`); the same ids in a different order hash differently.
pub fn hash_id_set(ids: impl IntoIterator<Item = u64>) -> SetHash {
    let mut bytes = Vec::new();
    for id in ids {
        bytes.extend_from_slice(&id.to_le_bytes());
    }
    SetHash(xxhash_rust::xxh3::xxh3_64(&bytes))
}
