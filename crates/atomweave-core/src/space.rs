//! # AtomSpace
//!
//! The reference coordinator: the smallest thing that drives atoms through
//! their lifecycle correctly.
//!
//! - Deduplicates by content across the whole environment (this space and
//!   every ancestor), so each distinct atom has one canonical instance.
//! - Adds children before the links that hold them.
//! - Sets the owning context, turns on the incoming index and installs.
//! - Layers child spaces over parents with copy-on-write value writes.
//!
//! Each space is backed by a [`Frame`]; a child space's frame lists its
//! parents' frames. Reads fall through to ancestors. Writes never touch an
//! ancestor: a value written through a child onto an inherited atom lands on
//! a shadow copy owned by the child.

use crate::atom::Atom;
use crate::config::SpaceConfig;
use crate::frame::Frame;
use crate::handle::{Handle, HandleSeq, IncomingSet};
use crate::lock_pool::LockPool;
use crate::types::{ATOM_SPACE, AtomError, AtomType};
use crate::value::ValuePtr;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A content-deduplicated set of atoms, optionally layered over parents.
pub struct AtomSpace {
    config: SpaceConfig,
    pool: Arc<LockPool>,
    frame: Frame,
    parents: Vec<Arc<AtomSpace>>,
    atoms: RwLock<BTreeSet<Handle>>,
}

impl AtomSpace {
    /// Create a root space with its own lock pool.
    pub fn new(config: SpaceConfig) -> Result<Arc<Self>, AtomError> {
        config.validate()?;
        let pool = Arc::new(LockPool::new(config.lock_pool_size)?);
        let frame = Frame::with_type(&pool, ATOM_SPACE, &[])?;
        tracing::debug!(lock_pool_size = config.lock_pool_size, "atom space created");
        Ok(Arc::new(Self {
            config,
            pool,
            frame,
            parents: Vec::new(),
            atoms: RwLock::new(BTreeSet::new()),
        }))
    }

    /// Create an overlay over one or more parent spaces.
    ///
    /// The child shares the first parent's lock pool and configuration.
    pub fn child(parents: &[&Arc<AtomSpace>]) -> Result<Arc<Self>, AtomError> {
        let Some(first) = parents.first() else {
            return Err(AtomError::InvalidConstruction(
                "a child space needs at least one parent".to_string(),
            ));
        };
        let pool = Arc::clone(&first.pool);
        let parent_frames: Vec<Frame> = parents.iter().map(|p| p.frame.clone()).collect();
        let frame = Frame::with_type(&pool, ATOM_SPACE, &parent_frames)?;
        tracing::debug!(parents = parents.len(), "child space created");
        Ok(Arc::new(Self {
            config: first.config,
            pool,
            frame,
            parents: parents.iter().map(|p| Arc::clone(p)).collect(),
            atoms: RwLock::new(BTreeSet::new()),
        }))
    }

    #[must_use]
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<LockPool> {
        &self.pool
    }

    /// The frame backing this space.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn parents(&self) -> &[Arc<AtomSpace>] {
        &self.parents
    }

    // =========================================================================
    // ADDING
    // =========================================================================

    /// Add a node, or return the existing one with the same content.
    pub fn add_node(&self, ty: AtomType, name: impl Into<String>) -> Result<Handle, AtomError> {
        let probe = Atom::node(&self.pool, ty, name)?;
        self.add_atom(&probe)
    }

    /// Add a link and, first, any of its children not yet in the space.
    pub fn add_link(&self, ty: AtomType, outgoing: HandleSeq) -> Result<Handle, AtomError> {
        let probe = Atom::link(&self.pool, ty, outgoing)?;
        self.add_atom(&probe)
    }

    /// Add a content copy of `atom`, reusing any content-equal atom already
    /// visible from this space. Values on `atom` are copied onto a new copy.
    pub fn add_atom(&self, atom: &Handle) -> Result<Handle, AtomError> {
        if atom.is_frame() {
            return Err(AtomError::InvalidConstruction(format!(
                "{} is a frame and cannot be stored in a space",
                atom.atom_type()
            )));
        }
        if let Some(existing) = self.get_atom(atom) {
            return Ok(existing);
        }

        let built = if atom.is_link() {
            let children = atom
                .outgoing_set()?
                .iter()
                .map(|child| self.add_atom(child))
                .collect::<Result<HandleSeq, _>>()?;
            Atom::link(&self.pool, atom.atom_type(), children)?
        } else {
            Atom::node(&self.pool, atom.atom_type(), atom.name()?)?
        };
        built.copy_values(atom);
        Ok(self.adopt(built))
    }

    /// Store `built` locally unless a racing writer got there first.
    fn adopt(&self, built: Handle) -> Handle {
        built.set_owning_context(Some(&self.frame));
        built.keep_incoming_set();
        {
            let mut atoms = self.atoms.write();
            if let Some(existing) = atoms.get(&built) {
                return existing.clone();
            }
            atoms.insert(built.clone());
        }
        built.install();
        tracing::debug!(atom = %built.to_short_string(), "atom added");
        built
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    fn local(&self, probe: &Handle) -> Option<Handle> {
        self.atoms.read().get(probe).cloned()
    }

    /// The instance of `probe` visible from this space, nearest first.
    #[must_use]
    pub fn get_atom(&self, probe: &Handle) -> Option<Handle> {
        self.local(probe)
            .or_else(|| self.parents.iter().find_map(|p| p.get_atom(probe)))
    }

    #[must_use]
    pub fn contains(&self, probe: &Handle) -> bool {
        self.get_atom(probe).is_some()
    }

    /// Number of atoms stored in this space itself.
    #[must_use]
    pub fn size(&self) -> usize {
        self.atoms.read().len()
    }

    /// Every visible atom of type `ty` (or a subtype), in content order.
    #[must_use]
    pub fn get_atoms_by_type(&self, ty: AtomType, subtypes: bool) -> Vec<Handle> {
        let mut found = BTreeSet::new();
        self.collect_by_type(ty, subtypes, &mut found);
        found.into_iter().collect()
    }

    fn collect_by_type(&self, ty: AtomType, subtypes: bool, found: &mut BTreeSet<Handle>) {
        let local: Vec<Handle> = self
            .atoms
            .read()
            .iter()
            .filter(|h| {
                let t = h.atom_type();
                t == ty || (subtypes && t.is_a(ty))
            })
            .cloned()
            .collect();
        // Nearer spaces run first; `insert` keeps the first instance seen.
        for handle in local {
            found.insert(handle);
        }
        for parent in &self.parents {
            parent.collect_by_type(ty, subtypes, found);
        }
    }

    /// Incoming set of `atom` restricted to what this space can see.
    #[must_use]
    pub fn incoming_set(&self, atom: &Handle) -> IncomingSet {
        atom.incoming_set(Some(&self.frame))
    }

    // =========================================================================
    // REMOVAL
    // =========================================================================

    /// Remove an atom stored in this space.
    ///
    /// Returns `Ok(false)` if the atom is not stored here, or if it still
    /// has visible incoming links and `recursive` is false. With `recursive`,
    /// those links are removed first, and the atom stays if any of them
    /// cannot be removed.
    pub fn remove_atom(&self, atom: &Handle, recursive: bool) -> Result<bool, AtomError> {
        let Some(target) = self.local(atom) else {
            return Ok(false);
        };
        if target.mark_for_removal() {
            // Someone else is removing it.
            return Ok(false);
        }

        let incoming = self.incoming_set(&target);
        if !incoming.is_empty() {
            if !recursive {
                target.unset_removal_flag();
                return Ok(false);
            }
            for link in &incoming {
                match self.remove_atom(link, true) {
                    Ok(true) => {}
                    other => {
                        // A link that stays would still list the target.
                        target.unset_removal_flag();
                        return other;
                    }
                }
            }
        }

        let removed = self.atoms.write().remove(&target);
        if !removed {
            target.unset_removal_flag();
            return Ok(false);
        }
        target.remove();
        target.set_owning_context(None);
        target.set_absent();
        target.unset_removal_flag();
        tracing::debug!(atom = %target.to_short_string(), recursive, "atom removed");
        Ok(true)
    }

    // =========================================================================
    // VALUES (copy-on-write)
    // =========================================================================

    /// The instance this space may write to, shadowing an inherited one.
    fn writable(&self, atom: &Handle) -> Result<Handle, AtomError> {
        if let Some(own) = self.local(atom) {
            return Ok(own);
        }
        let Some(inherited) = self.get_atom(atom) else {
            return self.add_atom(atom);
        };

        let shadow = if inherited.is_link() {
            Atom::link(&self.pool, inherited.atom_type(), inherited.outgoing_set()?.to_vec())?
        } else {
            Atom::node(&self.pool, inherited.atom_type(), inherited.name()?)?
        };
        shadow.copy_values(&inherited);
        tracing::debug!(atom = %shadow.to_short_string(), "shadow copy created");
        Ok(self.adopt(shadow))
    }

    /// Write a value through this space. Returns the instance written to.
    pub fn set_value(
        &self,
        atom: &Handle,
        key: &Handle,
        value: Option<ValuePtr>,
    ) -> Result<Handle, AtomError> {
        let target = self.writable(atom)?;
        target.set_value(key, value);
        Ok(target)
    }

    /// Increment a float vector through this space.
    pub fn increment_count(
        &self,
        atom: &Handle,
        key: &Handle,
        delta: &[f64],
    ) -> Result<ValuePtr, AtomError> {
        self.writable(atom)?.increment_count(key, delta)
    }

    /// Value of `key` on the nearest visible instance of `atom`.
    #[must_use]
    pub fn get_value(&self, atom: &Handle, key: &Handle) -> Option<ValuePtr> {
        self.get_atom(atom).and_then(|h| h.get_value(key))
    }
}

impl fmt::Debug for AtomSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomSpace")
            .field("frame", &self.frame)
            .field("parents", &self.parents.len())
            .field("size", &self.size())
            .finish()
    }
}
