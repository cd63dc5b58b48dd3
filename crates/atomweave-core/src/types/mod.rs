//! # Core Type Definitions
//!
//! This module contains the type vocabulary of the atom store:
//! - Content identity (`ContentHash`)
//! - Structural kinds (`StructuralKind`) and type descriptors (`TypeSpec`, `AtomType`)
//! - The per-type behavior table (`AtomBehavior` and the built-in behaviors)
//! - The built-in type constants and the runtime lookup table (`TypeTable`)
//! - Error types (`AtomError`)
//!
//! ## Closed kinds, open types
//!
//! Every atom has one of three structural kinds: a node, a link, or a frame.
//! The kind decides the shape of the atom. The *type* on top of the kind is
//! open: anyone can declare a `static` [`TypeSpec`] with its own behavior and
//! use it exactly like a built-in one.

mod behavior;
mod builtin;
mod table;

pub use behavior::{AtomBehavior, FrameBehavior, OrderedBehavior, UnorderedBehavior};
pub use builtin::*;
pub use table::TypeTable;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

// =============================================================================
// CONTENT IDENTITY
// =============================================================================

/// Deterministic 64-bit fingerprint of an atom's type and structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub u64);

impl ContentHash {
    /// Get the raw hash value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// True if the hash lies in link-space (most significant bit set).
    #[must_use]
    pub const fn is_link_space(self) -> bool {
        self.0 & crate::primitives::LINK_HASH_BIT != 0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// =============================================================================
// STRUCTURAL KINDS
// =============================================================================

/// The closed set of atom shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StructuralKind {
    /// Leaf atom carrying a name.
    Node,
    /// Internal atom carrying an ordered outgoing set.
    Link,
    /// Link whose outgoing set lists parent frames.
    Frame,
}

impl StructuralKind {
    /// Frames are links; nodes are not.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Link | Self::Frame)
    }
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Node => "node",
            Self::Link => "link",
            Self::Frame => "frame",
        };
        f.write_str(s)
    }
}

// =============================================================================
// TYPE DESCRIPTORS
// =============================================================================

/// Static description of one atom type.
///
/// The `name` participates in the content hash, the numeric `id` does not,
/// so renumbering types never changes identity.
pub struct TypeSpec {
    id: u16,
    name: &'static str,
    kind: StructuralKind,
    parent: Option<&'static TypeSpec>,
    behavior: &'static dyn AtomBehavior,
}

impl TypeSpec {
    /// Declare a type. Intended for `static` items.
    pub const fn new(
        id: u16,
        name: &'static str,
        kind: StructuralKind,
        parent: Option<&'static TypeSpec>,
        behavior: &'static dyn AtomBehavior,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            parent,
            behavior,
        }
    }
}

impl fmt::Debug for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeSpec")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent.map(|p| p.name))
            .field("behavior", &self.behavior)
            .finish()
    }
}

/// Copyable reference to a [`TypeSpec`].
///
/// Two `AtomType`s are equal only when they wrap the same descriptor, so a
/// custom type that reuses a built-in id or name stays a distinct type.
/// Ordering goes by id, then name, then descriptor address.
#[derive(Clone, Copy)]
pub struct AtomType(&'static TypeSpec);

impl AtomType {
    /// Wrap a static type descriptor.
    #[must_use]
    pub const fn new(spec: &'static TypeSpec) -> Self {
        Self(spec)
    }

    #[must_use]
    pub const fn id(self) -> u16 {
        self.0.id
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0.name
    }

    #[must_use]
    pub const fn kind(self) -> StructuralKind {
        self.0.kind
    }

    #[must_use]
    pub fn parent(self) -> Option<AtomType> {
        self.0.parent.map(AtomType)
    }

    /// The behavior hooks attached to this type.
    #[must_use]
    pub fn behavior(self) -> &'static dyn AtomBehavior {
        self.0.behavior
    }

    #[must_use]
    pub const fn is_node(self) -> bool {
        matches!(self.0.kind, StructuralKind::Node)
    }

    #[must_use]
    pub const fn is_link(self) -> bool {
        self.0.kind.is_link()
    }

    #[must_use]
    pub const fn is_frame(self) -> bool {
        matches!(self.0.kind, StructuralKind::Frame)
    }

    /// True if `self` equals `other` or inherits from it.
    #[must_use]
    pub fn is_a(self, other: AtomType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }
}

impl PartialEq for AtomType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for AtomType {}

impl PartialOrd for AtomType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AtomType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .id
            .cmp(&other.0.id)
            .then_with(|| self.0.name.cmp(other.0.name))
            .then_with(|| std::ptr::from_ref(self.0).cmp(&std::ptr::from_ref(other.0)))
    }
}

impl Hash for AtomType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
        self.0.name.hash(state);
    }
}

impl fmt::Debug for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.0.name, self.0.id)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the atom store.
///
/// - No silent failures
/// - Use `Result<T, AtomError>` for fallible operations
/// - The CORE never panics; all errors are recoverable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    /// A node-only accessor was used on a link, or the reverse.
    #[error("Wrong kind: expected {expected}, got {found}")]
    WrongKind {
        expected: StructuralKind,
        found: String,
    },

    /// An atom could not be built from the given parts.
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),

    /// An outgoing-set index past the arity.
    #[error("Index {index} out of range for arity {arity}")]
    IndexOutOfRange { index: usize, arity: usize },

    /// A stored value does not have the type an operation needs.
    #[error("Value type mismatch: expected {expected}, found {found}")]
    ValueTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A type name or id is not present in the type table.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A type with the same name or id is already registered.
    #[error("Duplicate type: {0}")]
    DuplicateType(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
