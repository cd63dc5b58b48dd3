//! # Innate Primitives
//!
//! Hardcoded constants for the atomweave CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Changing any of the hash constants changes every content hash, so they
//! are part of the identity contract of the store.

/// Default number of read/write locks in a [`crate::LockPool`].
///
/// Roughly four times the core count of a large machine keeps the chance of
/// two busy atoms sharing a lock small.
pub const DEFAULT_LOCK_POOL_SIZE: usize = 256;

/// Upper bound for a configured lock pool.
pub const MAX_LOCK_POOL_SIZE: usize = 1 << 20;

/// Bit set on every link hash and cleared on every node hash.
///
/// Keeps link-space and node-space disjoint.
pub const LINK_HASH_BIT: u64 = 1 << 63;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Multiplier applied to each child hash before it is folded into a link hash.
pub const CHILD_MULTIPLIER: u64 = 0x9e37_79b9_7f4a_7c15;

/// Name of the predicate used as the reserved truth-value key.
pub const TRUTH_KEY_NAME: &str = "*-TruthValueKey-*";

/// Maximum frame-DAG depth walked when resolving ancestry.
///
/// All ancestry checks must be computationally bounded.
pub const MAX_FRAME_DEPTH: usize = 1024;
