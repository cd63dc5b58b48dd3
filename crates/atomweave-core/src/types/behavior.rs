//! Per-type behavior hooks.
//!
//! A type's behavior is resolved through its [`super::TypeSpec`] at
//! construction time. Hooks never see locks and never mutate atoms.

use super::{AtomError, AtomType};
use crate::Handle;
use std::fmt;

/// Construction-time hooks attached to an atom type.
///
/// Implementors must be stateless and pure: the same input always produces
/// the same output, since the result feeds the content hash.
pub trait AtomBehavior: Send + Sync + fmt::Debug {
    /// Reject outgoing sets this type cannot hold.
    fn validate(&self, _ty: AtomType, _outgoing: &[Handle]) -> Result<(), AtomError> {
        Ok(())
    }

    /// Put the outgoing set into canonical order before hashing.
    fn canonicalize(&self, outgoing: Vec<Handle>) -> Vec<Handle> {
        outgoing
    }
}

/// Outgoing order is significant. The default for links and nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedBehavior;

impl AtomBehavior for OrderedBehavior {}

/// Outgoing order is not significant; the set is sorted into content order.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnorderedBehavior;

impl AtomBehavior for UnorderedBehavior {
    fn canonicalize(&self, mut outgoing: Vec<Handle>) -> Vec<Handle> {
        outgoing.sort();
        outgoing
    }
}

/// Every member of the outgoing set must itself be a frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameBehavior;

impl AtomBehavior for FrameBehavior {
    fn validate(&self, ty: AtomType, outgoing: &[Handle]) -> Result<(), AtomError> {
        match outgoing.iter().find(|h| !h.atom_type().is_frame()) {
            Some(bad) => Err(AtomError::InvalidConstruction(format!(
                "{} can only hold frames, got {}",
                ty,
                bad.atom_type()
            ))),
            None => Ok(()),
        }
    }
}
