//! # Incoming-Set Index
//!
//! Per-atom map from link type to the set of links of that type that list
//! the atom in their outgoing set.
//!
//! Entries are [`WeakHandle`]s: the index never keeps a link alive. A link
//! that has been destroyed without being removed leaves a dead entry behind;
//! enumeration skips it and [`IncomingIndex::scrub`] drops it.
//!
//! This type holds no lock. The owning atom wraps it in its pooled cell and
//! calls these methods while holding the appropriate guard.

use crate::handle::{Handle, WeakHandle};
use crate::types::AtomType;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
pub(crate) struct IncomingIndex {
    buckets: BTreeMap<AtomType, BTreeSet<WeakHandle>>,
}

impl IncomingIndex {
    pub(crate) fn insert(&mut self, ty: AtomType, link: WeakHandle) -> bool {
        self.buckets.entry(ty).or_default().insert(link)
    }

    pub(crate) fn remove(&mut self, ty: AtomType, link: &WeakHandle) -> bool {
        let Some(bucket) = self.buckets.get_mut(&ty) else {
            return false;
        };
        let removed = bucket.remove(link);
        if bucket.is_empty() {
            self.buckets.remove(&ty);
        }
        removed
    }

    /// Strong copies of every live entry.
    pub(crate) fn snapshot(&self) -> Vec<Handle> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().filter_map(WeakHandle::upgrade))
            .collect()
    }

    /// Strong copies of the live entries of one bucket.
    pub(crate) fn snapshot_type(&self, ty: AtomType) -> Vec<Handle> {
        self.buckets
            .get(&ty)
            .map(|bucket| bucket.iter().filter_map(WeakHandle::upgrade).collect())
            .unwrap_or_default()
    }

    /// Live entries, counted without upgrading.
    pub(crate) fn live_count(&self) -> usize {
        self.buckets
            .values()
            .map(|bucket| bucket.iter().filter(|w| !w.is_dead()).count())
            .sum()
    }

    /// Live entries of one bucket, counted without upgrading.
    pub(crate) fn live_count_type(&self, ty: AtomType) -> usize {
        self.buckets
            .get(&ty)
            .map(|bucket| bucket.iter().filter(|w| !w.is_dead()).count())
            .unwrap_or(0)
    }

    /// Drop every dead entry. Returns how many were removed.
    pub(crate) fn scrub(&mut self) -> usize {
        let mut removed = 0;
        self.buckets.retain(|_, bucket| {
            let before = bucket.len();
            bucket.retain(|w| !w.is_dead());
            removed += before - bucket.len();
            !bucket.is_empty()
        });
        removed
    }

    /// Entries including dead ones.
    pub(crate) fn entry_count(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }
}
