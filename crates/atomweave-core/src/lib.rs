//! # atomweave-core
//!
//! An in-memory hypergraph atom store.
//!
//! Atoms are nodes (type + name) or links (type + ordered outgoing set of
//! other atoms). Identity is by content: a deterministic hash over type and
//! structure, with a structural tie-break. Every atom carries:
//!
//! - a value map from key atoms to immutable typed payloads,
//! - an incoming index of weak back-references to the links that hold it,
//! - a small set of atomic flags.
//!
//! The value map and the incoming index are guarded by a lock picked from a
//! shared [`LockPool`] by content hash. Frames layer copy-on-write overlays
//! over a DAG of parents, and [`AtomSpace`] is the reference coordinator
//! that ties all of it together.
//!
//! ## Architectural Constraints
//!
//! - Ownership flows from container to contained; back-references are weak.
//! - No async, no I/O, no global lock pool.
//! - Every fallible operation returns [`AtomError`].

// =============================================================================
// MODULES
// =============================================================================

pub mod atom;
pub mod config;
pub mod frame;
pub mod handle;
pub mod hash;
mod incoming;
pub mod lock_pool;
pub mod primitives;
pub mod space;
pub mod types;
pub mod value;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AtomBehavior, AtomError, AtomType, BUILTIN_TYPES, ContentHash, StructuralKind, TypeSpec,
    TypeTable,
};

// =============================================================================
// RE-EXPORTS: Atoms
// =============================================================================

pub use atom::Atom;
pub use frame::Frame;
pub use handle::{Handle, HandleSeq, IncomingSet};
pub use lock_pool::LockPool;
pub use value::{TruthValue, Value, ValuePtr, truth_key};

// =============================================================================
// RE-EXPORTS: Coordinator
// =============================================================================

pub use config::SpaceConfig;
pub use space::AtomSpace;
