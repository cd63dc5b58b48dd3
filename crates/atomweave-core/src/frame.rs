//! # Frames
//!
//! A [`Frame`] is a link whose outgoing set holds its parent frames. Frames
//! form a DAG: every frame is alive as long as something holds it, and a
//! child keeps its parents alive through its outgoing set.
//!
//! Parents track their children through their incoming index, weakly. A
//! frame is installed into its parents when it is built, and a dropped frame
//! scrubs its parents on the way out, so an abandoned branch never leaves
//! dead entries behind.
//!
//! Atoms belong to at most one frame (their owning context). A frame sees an
//! atom if the atom belongs to the frame itself or to any of its ancestors;
//! see [`Frame::in_environ`].

use crate::atom::Atom;
use crate::handle::Handle;
use crate::lock_pool::LockPool;
use crate::primitives::MAX_FRAME_DEPTH;
use crate::types::{AtomError, AtomType, FRAME, StructuralKind};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A frame-kind atom.
///
/// Equality and ordering are by content, like any atom. Two root frames of
/// the same type are content-equal; use [`Frame::ptr_eq`] for identity.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frame(Handle);

impl Frame {
    /// Build a plain frame over `parents`.
    pub fn new(pool: &Arc<LockPool>, parents: &[Frame]) -> Result<Self, AtomError> {
        Self::with_type(pool, FRAME, parents)
    }

    /// Build a frame of a given frame-kind type.
    pub fn with_type(
        pool: &Arc<LockPool>,
        ty: AtomType,
        parents: &[Frame],
    ) -> Result<Self, AtomError> {
        if !ty.is_frame() {
            return Err(AtomError::InvalidConstruction(format!(
                "{} is a {} type, not a frame type",
                ty,
                ty.kind()
            )));
        }
        let outgoing = parents.iter().map(|p| p.0.clone()).collect();
        Atom::link(pool, ty, outgoing).map(Self)
    }

    /// View an existing handle as a frame.
    pub fn from_handle(handle: Handle) -> Result<Self, AtomError> {
        if handle.is_frame() {
            Ok(Self(handle))
        } else {
            Err(AtomError::WrongKind {
                expected: StructuralKind::Frame,
                found: handle.atom_type().name().to_string(),
            })
        }
    }

    /// Wrap a handle already known to be a frame.
    pub(crate) fn wrap(handle: Handle) -> Self {
        Self(handle)
    }

    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.0
    }

    #[must_use]
    pub fn into_handle(self) -> Handle {
        self.0
    }

    /// True if both frames are the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Frame, b: &Frame) -> bool {
        Handle::ptr_eq(&a.0, &b.0)
    }

    /// Direct parents, in construction order.
    #[must_use]
    pub fn parents(&self) -> Vec<Frame> {
        self.0
            .outgoing_set()
            .map(|out| out.iter().cloned().map(Self).collect())
            .unwrap_or_default()
    }

    /// Live direct children.
    #[must_use]
    pub fn children(&self) -> Vec<Frame> {
        self.0
            .incoming_set(None)
            .into_iter()
            .filter(|h| h.is_frame())
            .map(Self)
            .collect()
    }

    /// Register this frame with its parents. Idempotent.
    pub fn install(&self) {
        self.0.install();
    }

    /// Unregister this frame from its parents.
    pub fn remove(&self) {
        self.0.remove();
    }

    /// Drop dead children from this frame's index. Returns how many.
    pub fn scrub(&self) -> usize {
        self.0.scrub_incoming_set()
    }

    /// True if `self` is a strict ancestor of `other`.
    ///
    /// Walks at most [`MAX_FRAME_DEPTH`] distinct frames.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Frame) -> bool {
        let mut visited: Vec<Frame> = Vec::new();
        let mut stack = other.parents();
        while let Some(frame) = stack.pop() {
            if Self::ptr_eq(&frame, self) {
                return true;
            }
            if visited.iter().any(|v| Self::ptr_eq(v, &frame)) {
                continue;
            }
            if visited.len() >= MAX_FRAME_DEPTH {
                tracing::warn!(limit = MAX_FRAME_DEPTH, "frame ancestry walk truncated");
                return false;
            }
            stack.extend(frame.parents());
            visited.push(frame);
        }
        false
    }

    /// True if `atom` belongs to this frame or to one of its ancestors.
    #[must_use]
    pub fn in_environ(&self, atom: &Atom) -> bool {
        match atom.owning_context() {
            Some(owner) => Self::ptr_eq(&owner, self) || owner.is_ancestor_of(self),
            None => false,
        }
    }
}

impl Deref for Frame {
    type Target = Handle;

    fn deref(&self) -> &Handle {
        &self.0
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}, {})", self.0.atom_type(), self.0.get_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ATOM_SPACE, CONCEPT_NODE, LIST_LINK};

    fn pool() -> Arc<LockPool> {
        Arc::new(LockPool::default())
    }

    #[test]
    fn frames_only_hold_frames() {
        let pool = pool();
        let node = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        assert!(matches!(
            Atom::link(&pool, FRAME, vec![node.clone()]),
            Err(AtomError::InvalidConstruction(_))
        ));
        assert!(matches!(
            Frame::from_handle(node),
            Err(AtomError::WrongKind {
                expected: StructuralKind::Frame,
                ..
            })
        ));
        assert!(Frame::with_type(&pool, LIST_LINK, &[]).is_err());
    }

    #[test]
    fn construction_installs_into_parents() {
        let pool = pool();
        let root = Frame::new(&pool, &[]).expect("root");
        let child = Frame::with_type(&pool, ATOM_SPACE, &[root.clone()]).expect("child");

        let children = root.children();
        assert_eq!(children.len(), 1);
        assert!(Frame::ptr_eq(&children[0], &child));
        assert_eq!(child.parents().len(), 1);

        // Installing again does not duplicate.
        child.install();
        assert_eq!(root.children().len(), 1);

        child.remove();
        assert!(root.children().is_empty());
    }

    #[test]
    fn dropped_frame_is_scrubbed_from_parent() {
        let pool = pool();
        let root = Frame::new(&pool, &[]).expect("root");
        let child = Frame::new(&pool, &[root.clone()]).expect("child");
        assert_eq!(root.incoming_entry_count(), 1);

        drop(child);
        assert!(root.children().is_empty());
        assert_eq!(root.incoming_entry_count(), 0);
    }

    #[test]
    fn diamond_teardown_leaves_root_clean() {
        let pool = pool();
        let root = Frame::new(&pool, &[]).expect("root");
        let left = Frame::new(&pool, &[root.clone()]).expect("left");
        let right = Frame::new(&pool, &[root.clone()]).expect("right");
        let bottom = Frame::new(&pool, &[left.clone(), right.clone()]).expect("bottom");

        assert!(root.is_ancestor_of(&bottom));
        assert!(left.is_ancestor_of(&bottom));
        assert!(!bottom.is_ancestor_of(&root));
        assert!(!left.is_ancestor_of(&right));
        assert!(!root.is_ancestor_of(&root));

        drop(bottom);
        assert!(left.children().is_empty());
        assert!(right.children().is_empty());

        drop(left);
        drop(right);
        assert!(root.children().is_empty());
        assert_eq!(root.incoming_entry_count(), 0);
    }

    #[test]
    fn environ_covers_ancestors_only() {
        let pool = pool();
        let root = Frame::new(&pool, &[]).expect("root");
        let child = Frame::new(&pool, &[root.clone()]).expect("child");

        let in_root = Atom::node(&pool, CONCEPT_NODE, "r").expect("node");
        in_root.set_owning_context(Some(&root));
        let in_child = Atom::node(&pool, CONCEPT_NODE, "c").expect("node");
        in_child.set_owning_context(Some(&child));
        let detached = Atom::node(&pool, CONCEPT_NODE, "d").expect("node");

        assert!(child.in_environ(&in_root));
        assert!(child.in_environ(&in_child));
        assert!(root.in_environ(&in_root));
        assert!(!root.in_environ(&in_child));
        assert!(!root.in_environ(&detached));

        let owner = in_child.owning_context().expect("owner");
        assert!(Frame::ptr_eq(&owner, &child));
        in_child.set_owning_context(None);
        assert!(in_child.owning_context().is_none());
    }

    #[test]
    fn owning_context_does_not_keep_frame_alive() {
        let pool = pool();
        let root = Frame::new(&pool, &[]).expect("root");
        let atom = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        atom.set_owning_context(Some(&root));
        drop(root);
        assert!(atom.owning_context().is_none());
    }
}
