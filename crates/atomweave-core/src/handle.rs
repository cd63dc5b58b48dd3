//! # Handles
//!
//! [`Handle`] is the shared, reference-counted identity of an atom.
//!
//! ## Two orders
//!
//! - **Content order** is the public `Ord` of `Handle`. It compares content
//!   hashes first and falls back to a structural comparison, so it is stable
//!   across runs. Anything that sorts atoms or keys a map by atom uses it.
//! - **Owner order** compares allocation addresses. It is only available on
//!   the crate-private [`WeakHandle`], where it gives the incoming index cheap
//!   uniqueness. It is never exposed.
//!
//! `Handle` equality and hashing are by content too: two independently built
//! atoms with the same type and structure are equal. Use [`Handle::ptr_eq`]
//! when the question is "is this the same allocation".

use crate::atom::Atom;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// Strong, content-compared reference to an atom.
#[derive(Clone)]
pub struct Handle(Arc<Atom>);

/// Ordered outgoing sequence of a link.
pub type HandleSeq = Vec<Handle>;

/// Snapshot of an incoming set.
pub type IncomingSet = Vec<Handle>;

impl Handle {
    pub(crate) fn from_arc(atom: Arc<Atom>) -> Self {
        Self(atom)
    }

    /// True if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Handle, b: &Handle) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Number of strong holders of this atom.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub(crate) fn downgrade(&self) -> WeakHandle {
        WeakHandle(Arc::downgrade(&self.0))
    }

    pub(crate) fn downgrade_arc(&self) -> Weak<Atom> {
        Arc::downgrade(&self.0)
    }
}

impl Deref for Handle {
    type Target = Atom;

    fn deref(&self) -> &Atom {
        &self.0
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Handle::ptr_eq(self, other) || self.0.content_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Handle {}

impl PartialOrd for Handle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Handle {
    fn cmp(&self, other: &Self) -> Ordering {
        if Handle::ptr_eq(self, other) {
            return Ordering::Equal;
        }
        self.0.content_cmp(&other.0)
    }
}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.get_hash().value());
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0.to_short_string())
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

// =============================================================================
// WEAK HANDLE (owner-ordered, crate-private)
// =============================================================================

/// Non-owning back-reference, ordered and compared by allocation address.
///
/// A `Weak` keeps the allocation (not the atom) alive, so the address of a
/// dead entry is never reused while the entry exists.
#[derive(Clone)]
pub(crate) struct WeakHandle(Weak<Atom>);

impl WeakHandle {
    pub(crate) fn upgrade(&self) -> Option<Handle> {
        self.0.upgrade().map(Handle)
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.0.strong_count() == 0
    }

    fn addr(&self) -> usize {
        self.0.as_ptr().cast::<()>() as usize
    }
}

impl PartialEq for WeakHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for WeakHandle {}

impl PartialOrd for WeakHandle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeakHandle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.addr().cmp(&other.addr())
    }
}
