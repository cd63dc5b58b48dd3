//! # Atoms
//!
//! An [`Atom`] is a node (type + name) or a link (type + ordered outgoing
//! set). Shape is fixed at construction; only three things mutate afterwards:
//!
//! - the flag bits (lock-free atomics),
//! - the owning context (its own small lock),
//! - the value map and incoming index (the pooled lock).
//!
//! ## Locking
//!
//! The value map and the incoming index share one pooled lock, selected by
//! the content hash. Every method takes that lock for one short critical
//! section and releases it before returning. Handles and values displaced
//! by a write are dropped only after the lock is released: dropping the last
//! handle to a frame scrubs its parents, which takes *their* pooled lock.
//!
//! ## Lifecycle
//!
//! Atoms are born detached. A coordinator calls [`Handle::install`] to add a
//! link to the incoming index of each child and [`Handle::remove`] to take it
//! out again. Frames install themselves at construction.

use crate::frame::Frame;
use crate::handle::{Handle, HandleSeq, IncomingSet};
use crate::hash::{HashCell, link_hash, node_hash};
use crate::incoming::IncomingIndex;
use crate::lock_pool::{LockPool, PooledCell, PooledRead, PooledWrite};
use crate::types::{AtomError, AtomType, ContentHash, StructuralKind};
use crate::value::{self, TruthValue, Value, ValuePtr, truth_key};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

// =============================================================================
// FLAGS
// =============================================================================

const ABSENT_FLAG: u8 = 0x01;
const MARKED_FLAG: u8 = 0x02;
const CHECKED_FLAG: u8 = 0x04;
const USE_ISET_FLAG: u8 = 0x08;

// =============================================================================
// ATOM
// =============================================================================

enum Body {
    Node(String),
    Link(HandleSeq),
}

#[derive(Default)]
struct AtomState {
    values: BTreeMap<Handle, ValuePtr>,
    incoming: IncomingIndex,
}

/// A node or link of the hypergraph.
///
/// Always reached through a [`Handle`].
pub struct Atom {
    atom_type: AtomType,
    body: Body,
    hash: HashCell,
    flags: AtomicU8,
    context: RwLock<Option<Weak<Atom>>>,
    pool: Arc<LockPool>,
    state: PooledCell<AtomState>,
}

impl Atom {
    /// Build a detached node.
    pub fn node(
        pool: &Arc<LockPool>,
        ty: AtomType,
        name: impl Into<String>,
    ) -> Result<Handle, AtomError> {
        if !ty.is_node() {
            return Err(AtomError::InvalidConstruction(format!(
                "{} is a {} type, not a node type",
                ty,
                ty.kind()
            )));
        }
        Ok(Self::build_node(Arc::clone(pool), ty, name))
    }

    /// Build a link.
    ///
    /// The type's behavior validates and canonicalizes the outgoing set.
    /// Frame-kind links are installed into their parents before returning;
    /// every other link is returned detached.
    pub fn link(
        pool: &Arc<LockPool>,
        ty: AtomType,
        outgoing: HandleSeq,
    ) -> Result<Handle, AtomError> {
        if !ty.is_link() {
            return Err(AtomError::InvalidConstruction(format!(
                "{} is a {} type, not a link type",
                ty,
                ty.kind()
            )));
        }
        let behavior = ty.behavior();
        behavior.validate(ty, &outgoing)?;
        let outgoing = behavior.canonicalize(outgoing);

        let handle = Self::build(Arc::clone(pool), ty, Body::Link(outgoing));
        if ty.is_frame() {
            handle.keep_incoming_set();
            handle.install();
        }
        Ok(handle)
    }

    pub(crate) fn build_node(pool: Arc<LockPool>, ty: AtomType, name: impl Into<String>) -> Handle {
        Self::build(pool, ty, Body::Node(name.into()))
    }

    fn build(pool: Arc<LockPool>, atom_type: AtomType, body: Body) -> Handle {
        Handle::from_arc(Arc::new(Self {
            atom_type,
            body,
            hash: HashCell::default(),
            flags: AtomicU8::new(0),
            context: RwLock::new(None),
            pool,
            state: PooledCell::new(AtomState::default()),
        }))
    }

    // -------------------------------------------------------------------------
    // Shape
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn atom_type(&self) -> AtomType {
        self.atom_type
    }

    #[must_use]
    pub fn kind(&self) -> StructuralKind {
        self.atom_type.kind()
    }

    #[must_use]
    pub fn is_node(&self) -> bool {
        matches!(self.body, Body::Node(_))
    }

    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self.body, Body::Link(_))
    }

    #[must_use]
    pub fn is_frame(&self) -> bool {
        self.atom_type.is_frame()
    }

    /// Name of a node. Links have none.
    pub fn name(&self) -> Result<&str, AtomError> {
        match &self.body {
            Body::Node(name) => Ok(name),
            Body::Link(_) => Err(self.wrong_kind(StructuralKind::Node)),
        }
    }

    /// Outgoing set of a link. Nodes have none.
    pub fn outgoing_set(&self) -> Result<&[Handle], AtomError> {
        match &self.body {
            Body::Link(outgoing) => Ok(outgoing),
            Body::Node(_) => Err(self.wrong_kind(StructuralKind::Link)),
        }
    }

    /// One member of the outgoing set.
    pub fn outgoing_atom(&self, index: usize) -> Result<&Handle, AtomError> {
        let outgoing = self.outgoing_set()?;
        outgoing.get(index).ok_or(AtomError::IndexOutOfRange {
            index,
            arity: outgoing.len(),
        })
    }

    /// Size of the outgoing set; zero for nodes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match &self.body {
            Body::Link(outgoing) => outgoing.len(),
            Body::Node(_) => 0,
        }
    }

    /// The pool this atom takes its lock from.
    #[must_use]
    pub fn pool(&self) -> &Arc<LockPool> {
        &self.pool
    }

    fn wrong_kind(&self, expected: StructuralKind) -> AtomError {
        AtomError::WrongKind {
            expected,
            found: self.atom_type.name().to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Content identity
    // -------------------------------------------------------------------------

    /// Memoized content hash.
    pub fn get_hash(&self) -> ContentHash {
        self.hash.get_or_compute(|| self.compute_hash())
    }

    /// Content hash if already memoized.
    #[must_use]
    pub fn hash_if_computed(&self) -> Option<ContentHash> {
        self.hash.peek()
    }

    /// Compute the content hash from scratch.
    ///
    /// Pure: reads only the immutable shape and the children's hashes.
    #[must_use]
    pub fn compute_hash(&self) -> ContentHash {
        match &self.body {
            Body::Node(name) => node_hash(self.atom_type, name),
            Body::Link(outgoing) => link_hash(self.atom_type, outgoing.iter().map(|h| h.get_hash())),
        }
    }

    /// Content order: hash, then type name, then structure.
    ///
    /// Stable across runs; never consults addresses.
    pub fn content_cmp(&self, other: &Atom) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.get_hash()
            .cmp(&other.get_hash())
            .then_with(|| self.atom_type.name().cmp(other.atom_type.name()))
            .then_with(|| self.atom_type.id().cmp(&other.atom_type.id()))
            .then_with(|| match (&self.body, &other.body) {
                (Body::Node(a), Body::Node(b)) => a.cmp(b),
                (Body::Node(_), Body::Link(_)) => Ordering::Less,
                (Body::Link(_), Body::Node(_)) => Ordering::Greater,
                (Body::Link(a), Body::Link(b)) => {
                    a.len().cmp(&b.len()).then_with(|| a.iter().cmp(b.iter()))
                }
            })
    }

    /// Content equality.
    #[must_use]
    pub fn content_eq(&self, other: &Atom) -> bool {
        self.content_cmp(other) == Ordering::Equal
    }

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------

    fn flag(&self, bit: u8) -> bool {
        self.flags.load(AtomicOrdering::Acquire) & bit != 0
    }

    fn set_flag(&self, bit: u8) -> bool {
        self.flags.fetch_or(bit, AtomicOrdering::AcqRel) & bit != 0
    }

    fn clear_flag(&self, bit: u8) -> bool {
        self.flags.fetch_and(!bit, AtomicOrdering::AcqRel) & bit != 0
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.flag(ABSENT_FLAG)
    }

    /// Returns the previous state.
    pub fn set_absent(&self) -> bool {
        self.set_flag(ABSENT_FLAG)
    }

    /// Returns the previous absent state.
    pub fn set_present(&self) -> bool {
        self.clear_flag(ABSENT_FLAG)
    }

    #[must_use]
    pub fn is_marked_for_removal(&self) -> bool {
        self.flag(MARKED_FLAG)
    }

    /// Returns the previous state.
    pub fn mark_for_removal(&self) -> bool {
        self.set_flag(MARKED_FLAG)
    }

    /// Returns the previous state.
    pub fn unset_removal_flag(&self) -> bool {
        self.clear_flag(MARKED_FLAG)
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.flag(CHECKED_FLAG)
    }

    /// Returns the previous state.
    pub fn set_checked(&self) -> bool {
        self.set_flag(CHECKED_FLAG)
    }

    /// Returns the previous state.
    pub fn set_unchecked(&self) -> bool {
        self.clear_flag(CHECKED_FLAG)
    }

    /// True if this atom maintains an incoming index.
    #[must_use]
    pub fn uses_incoming_set(&self) -> bool {
        self.flag(USE_ISET_FLAG)
    }

    // -------------------------------------------------------------------------
    // Owning context
    // -------------------------------------------------------------------------

    /// The frame this atom currently belongs to, if it is still alive.
    #[must_use]
    pub fn owning_context(&self) -> Option<Frame> {
        self.context
            .read()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|atom| Frame::wrap(Handle::from_arc(atom)))
    }

    /// Point this atom at a new owning frame, or detach it.
    pub fn set_owning_context(&self, context: Option<&Frame>) {
        let weak = context.map(|frame| frame.handle().downgrade_arc());
        let previous = std::mem::replace(&mut *self.context.write(), weak);
        drop(previous);
    }

    // -------------------------------------------------------------------------
    // Pooled state
    // -------------------------------------------------------------------------

    fn read_state(&self) -> PooledRead<'_, AtomState> {
        let lock = self.pool.lock_for(self.get_hash());
        // SAFETY: the hash is immutable, so `lock` is the same lock for
        // every access to `self.state` over the atom's whole life.
        unsafe { self.state.read(lock) }
    }

    fn write_state(&self) -> PooledWrite<'_, AtomState> {
        let lock = self.pool.lock_for(self.get_hash());
        // SAFETY: as in `read_state`.
        unsafe { self.state.write(lock) }
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Store `value` under `key`; `None` removes the entry.
    pub fn set_value(&self, key: &Handle, value: Option<ValuePtr>) {
        let displaced = {
            let mut state = self.write_state();
            match value {
                Some(v) => state.values.insert(key.clone(), v).map(|old| (None, old)),
                None => state.values.remove_entry(key).map(|(k, old)| (Some(k), old)),
            }
        };
        drop(displaced);
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get_value(&self, key: &Handle) -> Option<ValuePtr> {
        self.read_state().values.get(key).cloned()
    }

    /// Every key with a value, in content order.
    #[must_use]
    pub fn get_keys(&self) -> Vec<Handle> {
        self.read_state().values.keys().cloned().collect()
    }

    /// True if at least one value is attached.
    #[must_use]
    pub fn have_values(&self) -> bool {
        !self.read_state().values.is_empty()
    }

    /// Copy every value of `other` onto this atom, replacing same-key entries.
    pub fn copy_values(&self, other: &Atom) {
        if std::ptr::eq(self, other) {
            return;
        }
        let copied: Vec<(Handle, ValuePtr)> = other
            .read_state()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();

        let mut displaced: Vec<(Handle, ValuePtr)> = Vec::new();
        {
            let mut state = self.write_state();
            for (key, value) in copied {
                match state.values.get_mut(&key) {
                    Some(slot) => displaced.push((key, std::mem::replace(slot, value))),
                    None => {
                        state.values.insert(key, value);
                    }
                }
            }
        }
        drop(displaced);
    }

    /// Remove every value.
    pub fn clear_values(&self) {
        let cleared = std::mem::take(&mut self.write_state().values);
        drop(cleared);
    }

    /// Render every key/value pair, one per line, in key order.
    #[must_use]
    pub fn values_to_string(&self) -> String {
        let pairs: Vec<(Handle, ValuePtr)> = self
            .read_state()
            .values
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        let mut out = String::new();
        for (key, value) in pairs {
            out.push_str(&format!("{} => {}\n", key.to_short_string(), value));
        }
        out
    }

    /// Atomically add `delta` element-wise to the float vector under `key`.
    pub fn increment_count(&self, key: &Handle, delta: &[f64]) -> Result<ValuePtr, AtomError> {
        self.read_modify_write(key, |existing| value::add_vector(existing, delta))
    }

    /// Atomically add `delta` at `index` of the float vector under `key`.
    pub fn increment_count_at(
        &self,
        key: &Handle,
        index: usize,
        delta: f64,
    ) -> Result<ValuePtr, AtomError> {
        self.read_modify_write(key, |existing| value::add_at(existing, index, delta))
    }

    fn read_modify_write(
        &self,
        key: &Handle,
        update: impl FnOnce(Option<&ValuePtr>) -> Result<ValuePtr, AtomError>,
    ) -> Result<ValuePtr, AtomError> {
        let (updated, displaced) = {
            let mut state = self.write_state();
            let updated = update(state.values.get(key))?;
            let displaced = state.values.insert(key.clone(), Arc::clone(&updated));
            (updated, displaced)
        };
        drop(displaced);
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Truth value (legacy accessors over the reserved key)
    // -------------------------------------------------------------------------

    /// Truth value, or [`TruthValue::DEFAULT`] when none is stored.
    #[must_use]
    pub fn truth_value(&self) -> TruthValue {
        self.get_value(truth_key())
            .and_then(|v| v.as_truth())
            .unwrap_or(TruthValue::DEFAULT)
    }

    pub fn set_truth_value(&self, tv: TruthValue) {
        self.set_value(truth_key(), Some(Value::truth(tv)));
    }

    /// Atomically add `delta` to the observation count of the truth value.
    pub fn increment_count_tv(&self, delta: f64) -> Result<TruthValue, AtomError> {
        let updated = self.read_modify_write(truth_key(), |existing| {
            value::add_count(existing, delta).map(Value::truth)
        })?;
        Ok(updated.as_truth().unwrap_or(TruthValue::DEFAULT))
    }

    // -------------------------------------------------------------------------
    // Incoming set
    // -------------------------------------------------------------------------

    /// Start maintaining an incoming index.
    pub fn keep_incoming_set(&self) {
        self.set_flag(USE_ISET_FLAG);
    }

    /// Stop maintaining the incoming index and discard it.
    pub fn drop_incoming_set(&self) {
        if !self.clear_flag(USE_ISET_FLAG) {
            return;
        }
        let discarded = std::mem::take(&mut self.write_state().incoming);
        drop(discarded);
    }

    /// Register `link` as containing this atom.
    pub fn insert_atom(&self, link: &Handle) -> bool {
        if !self.uses_incoming_set() {
            return false;
        }
        self.write_state()
            .incoming
            .insert(link.atom_type(), link.downgrade())
    }

    /// Unregister `link`.
    pub fn remove_atom(&self, link: &Handle) -> bool {
        if !self.uses_incoming_set() {
            return false;
        }
        self.write_state()
            .incoming
            .remove(link.atom_type(), &link.downgrade())
    }

    /// Replace `old` with `new` in one critical section.
    pub fn swap_atom(&self, old: &Handle, new: &Handle) -> bool {
        if !self.uses_incoming_set() {
            return false;
        }
        let mut state = self.write_state();
        let removed = state.incoming.remove(old.atom_type(), &old.downgrade());
        state.incoming.insert(new.atom_type(), new.downgrade());
        removed
    }

    /// Snapshot of the incoming set, optionally restricted to atoms alive
    /// in `context`.
    #[must_use]
    pub fn incoming_set(&self, context: Option<&Frame>) -> IncomingSet {
        if !self.uses_incoming_set() {
            return Vec::new();
        }
        let snapshot = self.read_state().incoming.snapshot();
        finish_snapshot(snapshot, context)
    }

    /// Snapshot of the incoming links of type `ty`.
    #[must_use]
    pub fn incoming_set_by_type(&self, ty: AtomType, context: Option<&Frame>) -> IncomingSet {
        if !self.uses_incoming_set() {
            return Vec::new();
        }
        let snapshot = self.read_state().incoming.snapshot_type(ty);
        finish_snapshot(snapshot, context)
    }

    #[must_use]
    pub fn incoming_set_size(&self, context: Option<&Frame>) -> usize {
        match context {
            None if self.uses_incoming_set() => self.read_state().incoming.live_count(),
            None => 0,
            Some(_) => self.incoming_set(context).len(),
        }
    }

    #[must_use]
    pub fn incoming_set_size_by_type(&self, ty: AtomType, context: Option<&Frame>) -> usize {
        match context {
            None if self.uses_incoming_set() => {
                self.read_state().incoming.live_count_type(ty)
            }
            None => 0,
            Some(_) => self.incoming_set_by_type(ty, context).len(),
        }
    }

    #[must_use]
    pub fn is_incoming_set_empty(&self, context: Option<&Frame>) -> bool {
        self.incoming_set_size(context) == 0
    }

    /// Drop dead entries from the incoming index. Returns how many.
    pub fn scrub_incoming_set(&self) -> usize {
        if !self.uses_incoming_set() {
            return 0;
        }
        self.write_state().incoming.scrub()
    }

    /// Index entries including dead ones not yet scrubbed.
    #[must_use]
    pub fn incoming_entry_count(&self) -> usize {
        if !self.uses_incoming_set() {
            return 0;
        }
        self.read_state().incoming.entry_count()
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Single-line s-expression.
    #[must_use]
    pub fn to_short_string(&self) -> String {
        let mut out = String::new();
        self.write_sexpr(&mut out, None);
        out
    }

    fn write_sexpr(&self, out: &mut String, indent: Option<&str>) {
        if let Some(pad) = indent {
            out.push_str(pad);
        }
        match &self.body {
            Body::Node(name) => out.push_str(&format!("({} {:?})", self.atom_type, name)),
            Body::Link(outgoing) => {
                out.push('(');
                out.push_str(self.atom_type.name());
                let child_indent = indent.map(|pad| format!("{}  ", pad));
                for child in outgoing {
                    match &child_indent {
                        Some(pad) => {
                            out.push('\n');
                            child.write_sexpr(out, Some(pad));
                        }
                        None => {
                            out.push(' ');
                            child.write_sexpr(out, None);
                        }
                    }
                }
                out.push(')');
            }
        }
    }
}

/// Context filter plus content order. Runs after the guard is released.
fn finish_snapshot(snapshot: Vec<Handle>, context: Option<&Frame>) -> IncomingSet {
    let mut set: IncomingSet = match context {
        None => snapshot,
        Some(frame) => snapshot.into_iter().filter(|h| frame.in_environ(h)).collect(),
    };
    set.sort();
    set
}

// =============================================================================
// LIFECYCLE (needs a handle to self)
// =============================================================================

impl Handle {
    /// Add this link to the incoming index of each child. No-op for nodes.
    pub fn install(&self) {
        let Body::Link(outgoing) = &self.body else {
            return;
        };
        for child in outgoing {
            child.insert_atom(self);
        }
        tracing::trace!(atom = %self.to_short_string(), "installed");
    }

    /// Remove this link from the incoming index of each child.
    pub fn remove(&self) {
        let Body::Link(outgoing) = &self.body else {
            return;
        };
        for child in outgoing {
            child.remove_atom(self);
        }
        tracing::trace!(atom = %self.to_short_string(), "removed");
    }
}

impl Drop for Atom {
    fn drop(&mut self) {
        // A frame dropped without `remove()` leaves dead entries in its
        // parents; sweep them, along with any left by dead siblings.
        if !self.atom_type.is_frame() {
            return;
        }
        if let Body::Link(parents) = &self.body {
            for parent in parents {
                let scrubbed = parent.scrub_incoming_set();
                if scrubbed > 0 {
                    tracing::debug!(
                        parent = %parent.get_hash(),
                        scrubbed,
                        "scrubbed dead frames"
                    );
                }
            }
        }
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("type", &self.atom_type)
            .field("hash", &self.hash.peek())
            .field("flags", &self.flags.load(AtomicOrdering::Relaxed))
            .field("sexpr", &self.to_short_string())
            .finish()
    }
}

impl fmt::Display for Atom {
    /// Multi-line, indented s-expression.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_sexpr(&mut out, Some(""));
        f.write_str(&out)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CONCEPT_NODE, LIST_LINK, MEMBER_LINK, PREDICATE_NODE, SET_LINK};

    fn pool() -> Arc<LockPool> {
        Arc::new(LockPool::default())
    }

    fn indexed_node(pool: &Arc<LockPool>, name: &str) -> Handle {
        let node = Atom::node(pool, CONCEPT_NODE, name).expect("node");
        node.keep_incoming_set();
        node
    }

    #[test]
    fn kind_mismatch_is_an_error() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let l = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");

        assert!(matches!(
            a.outgoing_set(),
            Err(AtomError::WrongKind {
                expected: StructuralKind::Link,
                ..
            })
        ));
        assert!(matches!(
            l.name(),
            Err(AtomError::WrongKind {
                expected: StructuralKind::Node,
                ..
            })
        ));
        assert_eq!(
            l.outgoing_atom(3).err(),
            Some(AtomError::IndexOutOfRange { index: 3, arity: 1 })
        );
        assert_eq!(a.arity(), 0);
    }

    #[test]
    fn constructor_rejects_wrong_type_kind() {
        let pool = pool();
        assert!(matches!(
            Atom::node(&pool, LIST_LINK, "x"),
            Err(AtomError::InvalidConstruction(_))
        ));
        assert!(matches!(
            Atom::link(&pool, CONCEPT_NODE, Vec::new()),
            Err(AtomError::InvalidConstruction(_))
        ));
    }

    #[test]
    fn hash_is_lazy_and_memoized() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        assert_eq!(a.hash_if_computed(), None);
        let h = a.get_hash();
        assert_eq!(a.hash_if_computed(), Some(h));
        assert_eq!(a.compute_hash(), h);
    }

    #[test]
    fn unordered_links_ignore_order() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let b = Atom::node(&pool, CONCEPT_NODE, "b").expect("node");

        let ab = Atom::link(&pool, SET_LINK, vec![a.clone(), b.clone()]).expect("link");
        let ba = Atom::link(&pool, SET_LINK, vec![b.clone(), a.clone()]).expect("link");
        assert_eq!(ab, ba);
        assert_eq!(ab.get_hash(), ba.get_hash());

        let list_ab = Atom::link(&pool, LIST_LINK, vec![a.clone(), b.clone()]).expect("link");
        let list_ba = Atom::link(&pool, LIST_LINK, vec![b, a]).expect("link");
        assert_ne!(list_ab, list_ba);
    }

    #[test]
    fn flags_are_independent() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");

        assert!(!a.mark_for_removal());
        assert!(a.mark_for_removal());
        assert!(a.is_marked_for_removal());
        assert!(!a.is_checked());

        assert!(!a.set_checked());
        assert!(a.set_unchecked());
        assert!(!a.is_checked());

        assert!(!a.set_absent());
        assert!(a.is_absent());
        assert!(a.set_present());
        assert!(a.unset_removal_flag());
        assert!(!a.is_marked_for_removal());
    }

    #[test]
    fn empty_value_differs_from_missing() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let key = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");
        let other = Atom::node(&pool, PREDICATE_NODE, "other").expect("key");

        a.set_value(&key, Some(Value::float(Vec::<f64>::new())));
        assert_eq!(a.get_value(&key), Some(Value::float(Vec::<f64>::new())));
        assert_eq!(a.get_value(&other), None);
        assert!(a.have_values());

        a.set_value(&key, None);
        assert_eq!(a.get_value(&key), None);
        assert!(!a.have_values());
    }

    #[test]
    fn keys_are_content_equal_across_instances() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let k1 = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");
        let k2 = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");

        a.set_value(&k1, Some(Value::string(["x"])));
        assert_eq!(a.get_value(&k2), Some(Value::string(["x"])));
        assert_eq!(a.get_keys(), vec![k1]);
    }

    #[test]
    fn reader_keeps_old_value() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let key = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");

        a.set_value(&key, Some(Value::float([1.0])));
        let held = a.get_value(&key).expect("value");
        a.set_value(&key, Some(Value::float([2.0])));

        assert_eq!(held.as_floats(), Some(&[1.0][..]));
        assert_eq!(
            a.get_value(&key).and_then(|v| v.as_floats().map(<[f64]>::to_vec)),
            Some(vec![2.0])
        );
    }

    #[test]
    fn truth_value_slot_is_shared() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        assert_eq!(a.truth_value(), TruthValue::DEFAULT);
        assert_eq!(a.get_value(truth_key()), None);

        a.set_truth_value(TruthValue::simple(0.9, 0.8));
        assert_eq!(
            a.get_value(truth_key()),
            Some(Value::truth(TruthValue::simple(0.9, 0.8)))
        );

        a.set_value(truth_key(), Some(Value::truth(TruthValue::simple(0.1, 0.2))));
        assert_eq!(a.truth_value(), TruthValue::simple(0.1, 0.2));

        let tv = a.increment_count_tv(3.0).expect("tv");
        assert_eq!(tv, TruthValue::count(0.1, 0.2, 3.0));
        assert_eq!(a.truth_value(), tv);
    }

    #[test]
    fn increment_count_on_wrong_type_fails() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let key = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");

        a.set_value(&key, Some(Value::string(["nope"])));
        assert!(matches!(
            a.increment_count(&key, &[1.0]),
            Err(AtomError::ValueTypeMismatch { .. })
        ));
        // Failed increments leave the value alone.
        assert_eq!(a.get_value(&key), Some(Value::string(["nope"])));
    }

    #[test]
    fn increment_count_at_index() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let key = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");

        a.increment_count_at(&key, 1, 2.0).expect("inc");
        let v = a.increment_count(&key, &[1.0, 1.0]).expect("inc");
        assert_eq!(v.as_floats(), Some(&[1.0, 3.0][..]));
    }

    #[test]
    fn copy_and_clear_values() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let b = Atom::node(&pool, CONCEPT_NODE, "b").expect("node");
        let k1 = Atom::node(&pool, PREDICATE_NODE, "k1").expect("key");
        let k2 = Atom::node(&pool, PREDICATE_NODE, "k2").expect("key");

        a.set_value(&k1, Some(Value::float([1.0])));
        a.set_value(&k2, Some(Value::float([2.0])));
        b.set_value(&k1, Some(Value::float([9.0])));

        b.copy_values(&a);
        assert_eq!(b.get_value(&k1), Some(Value::float([1.0])));
        assert_eq!(b.get_value(&k2), Some(Value::float([2.0])));

        a.copy_values(&a);
        assert_eq!(a.get_keys().len(), 2);

        b.clear_values();
        assert!(!b.have_values());
        assert!(a.have_values());
    }

    #[test]
    fn values_to_string_lists_pairs() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let key = Atom::node(&pool, PREDICATE_NODE, "k").expect("key");
        a.set_value(&key, Some(Value::float([1.0])));
        assert_eq!(
            a.values_to_string(),
            "(PredicateNode \"k\") => (FloatValue 1)\n"
        );
    }

    #[test]
    fn install_and_remove_maintain_incoming() {
        let pool = pool();
        let a = indexed_node(&pool, "a");
        let b = indexed_node(&pool, "b");
        let l = Atom::link(&pool, LIST_LINK, vec![a.clone(), b.clone()]).expect("link");

        assert!(a.is_incoming_set_empty(None));
        l.install();
        assert_eq!(a.incoming_set(None), vec![l.clone()]);
        assert_eq!(b.incoming_set_by_type(LIST_LINK, None), vec![l.clone()]);
        assert!(b.incoming_set_by_type(MEMBER_LINK, None).is_empty());
        assert_eq!(a.incoming_set_size_by_type(LIST_LINK, None), 1);

        l.remove();
        assert!(a.incoming_set(None).is_empty());
        assert!(b.incoming_set(None).is_empty());
    }

    #[test]
    fn custom_type_with_reused_id_gets_its_own_bucket() {
        use crate::types::{LINK_SPEC, OrderedBehavior, TypeSpec};
        static FOO_LINK_SPEC: TypeSpec = TypeSpec::new(
            17,
            "FooLink",
            StructuralKind::Link,
            Some(&LINK_SPEC),
            &OrderedBehavior,
        );
        let foo_link = AtomType::new(&FOO_LINK_SPEC);

        let pool = pool();
        let a = indexed_node(&pool, "a");
        let foo = Atom::link(&pool, foo_link, vec![a.clone()]).expect("link");
        let list = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");
        foo.install();

        assert_ne!(foo, list);
        assert!(a.incoming_set_by_type(LIST_LINK, None).is_empty());
        assert_eq!(a.incoming_set_size_by_type(LIST_LINK, None), 0);
        assert_eq!(a.incoming_set_by_type(foo_link, None), vec![foo.clone()]);

        list.install();
        assert_eq!(a.incoming_set_by_type(LIST_LINK, None), vec![list]);
        assert_eq!(a.incoming_set_size(None), 2);
    }

    #[test]
    fn unindexed_atoms_ignore_inserts() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let l = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");
        l.install();
        assert!(a.incoming_set(None).is_empty());
        assert_eq!(a.incoming_set_size(None), 0);
    }

    #[test]
    fn drop_incoming_set_discards_entries() {
        let pool = pool();
        let a = indexed_node(&pool, "a");
        let l = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");
        l.install();
        a.drop_incoming_set();
        assert!(!a.uses_incoming_set());
        assert_eq!(a.incoming_entry_count(), 0);
    }

    #[test]
    fn swap_replaces_entry() {
        let pool = pool();
        let a = indexed_node(&pool, "a");
        let b = Atom::node(&pool, CONCEPT_NODE, "b").expect("node");
        let old = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");
        let new = Atom::link(&pool, MEMBER_LINK, vec![a.clone(), b]).expect("link");
        old.install();

        assert!(a.swap_atom(&old, &new));
        assert_eq!(a.incoming_set(None), vec![new]);
    }

    #[test]
    fn dead_links_vanish_from_enumeration() {
        let pool = pool();
        let a = indexed_node(&pool, "a");
        let l = Atom::link(&pool, LIST_LINK, vec![a.clone()]).expect("link");
        l.install();
        drop(l);

        assert!(a.incoming_set(None).is_empty());
        assert_eq!(a.incoming_set_size(None), 0);
        assert_eq!(a.incoming_entry_count(), 1);
        assert_eq!(a.scrub_incoming_set(), 1);
        assert_eq!(a.incoming_entry_count(), 0);
    }

    #[test]
    fn rendering_forms() {
        let pool = pool();
        let a = Atom::node(&pool, CONCEPT_NODE, "a").expect("node");
        let b = Atom::node(&pool, CONCEPT_NODE, "b").expect("node");
        let l = Atom::link(&pool, LIST_LINK, vec![a, b]).expect("link");

        assert_eq!(
            l.to_short_string(),
            "(ListLink (ConceptNode \"a\") (ConceptNode \"b\"))"
        );
        assert_eq!(
            l.to_string(),
            "(ListLink\n  (ConceptNode \"a\")\n  (ConceptNode \"b\"))"
        );
    }
}
