//! # Content-Hash Engine
//!
//! Pure functions computing the fingerprint of an atom, plus the memo cell
//! that caches it.
//!
//! ## Recipe
//!
//! 1. Start from FNV-1a over the type *name* (never the numeric id).
//! 2. Fold in the node name, or each child hash in outgoing order. Every
//!    fold runs the avalanche finalizer, so the fold is not commutative.
//! 3. Finalize once more, then set (links) or clear (nodes) the top bit.
//!
//! FNV-1a is used instead of `std::hash` because the standard hasher makes
//! no promise of stability across releases or platforms.

use crate::primitives::{CHILD_MULTIPLIER, FNV_OFFSET_BASIS, FNV_PRIME, LINK_HASH_BIT};
use crate::types::{AtomType, ContentHash};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// FNV-1a over the UTF-8 bytes of `s`.
#[must_use]
pub fn hash_str(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Avalanche finalizer: three shift/xor/multiply rounds.
///
/// A one-bit change in the input flips about half of the output bits.
#[must_use]
pub const fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 30;
    h = h.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 27;
    h = h.wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^= h >> 31;
    h
}

/// Order-sensitive fold of one component into an accumulator.
#[must_use]
pub const fn fold(acc: u64, component: u64) -> u64 {
    avalanche(acc.rotate_left(5) ^ component.wrapping_mul(CHILD_MULTIPLIER))
}

/// Hash of a node: type name plus node name, top bit cleared.
#[must_use]
pub fn node_hash(ty: AtomType, name: &str) -> ContentHash {
    let h = fold(hash_str(ty.name()), hash_str(name));
    ContentHash(avalanche(h) & !LINK_HASH_BIT)
}

/// Hash of a link: type name plus each child hash in order, top bit set.
#[must_use]
pub fn link_hash(ty: AtomType, children: impl IntoIterator<Item = ContentHash>) -> ContentHash {
    let mut h = hash_str(ty.name());
    let mut arity: u64 = 0;
    for child in children {
        h = fold(h, child.value());
        arity = arity.wrapping_add(1);
    }
    // Arity keeps [] distinct from a type-name collision with one child.
    h = fold(h, arity);
    ContentHash(avalanche(h) | LINK_HASH_BIT)
}

// =============================================================================
// MEMO CELL
// =============================================================================

/// Memoized content hash: an explicit "computed" flag plus the value.
///
/// No hash value is reserved as an "unset" marker. Two threads racing on
/// the first call may both compute; both store the same pure result.
#[derive(Debug, Default)]
pub(crate) struct HashCell {
    computed: AtomicBool,
    value: AtomicU64,
}

impl HashCell {
    pub(crate) fn get_or_compute(&self, compute: impl FnOnce() -> ContentHash) -> ContentHash {
        if self.computed.load(Ordering::Acquire) {
            return ContentHash(self.value.load(Ordering::Relaxed));
        }
        let hash = compute();
        self.value.store(hash.value(), Ordering::Relaxed);
        self.computed.store(true, Ordering::Release);
        hash
    }

    pub(crate) fn peek(&self) -> Option<ContentHash> {
        self.computed
            .load(Ordering::Acquire)
            .then(|| ContentHash(self.value.load(Ordering::Relaxed)))
    }
}
