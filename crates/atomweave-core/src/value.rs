//! # Values
//!
//! Opaque typed payloads attached to atoms under atom keys.
//!
//! A stored value is never mutated in place. Writers build a new value and
//! swap the `Arc`; a reader holding an older [`ValuePtr`] keeps seeing the
//! old, complete value.

use crate::handle::Handle;
use crate::primitives::TRUTH_KEY_NAME;
use crate::types::{AtomError, PREDICATE_NODE};
use crate::{Atom, LockPool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Shared, immutable value.
pub type ValuePtr = Arc<Value>;

// =============================================================================
// TRUTH VALUES
// =============================================================================

/// Degree-of-belief metadata, stored under [`truth_key`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TruthValue {
    /// Strength and confidence.
    Simple { strength: f64, confidence: f64 },
    /// Strength, confidence and an observation count.
    Count {
        strength: f64,
        confidence: f64,
        count: f64,
    },
}

impl TruthValue {
    /// The value reported for atoms that never had one set.
    pub const DEFAULT: TruthValue = TruthValue::Simple {
        strength: 1.0,
        confidence: 0.0,
    };

    #[must_use]
    pub const fn simple(strength: f64, confidence: f64) -> Self {
        Self::Simple {
            strength,
            confidence,
        }
    }

    #[must_use]
    pub const fn count(strength: f64, confidence: f64, count: f64) -> Self {
        Self::Count {
            strength,
            confidence,
            count,
        }
    }

    #[must_use]
    pub const fn strength(&self) -> f64 {
        match *self {
            Self::Simple { strength, .. } | Self::Count { strength, .. } => strength,
        }
    }

    #[must_use]
    pub const fn confidence(&self) -> f64 {
        match *self {
            Self::Simple { confidence, .. } | Self::Count { confidence, .. } => confidence,
        }
    }

    /// Observation count; `None` for simple truth values.
    #[must_use]
    pub const fn observations(&self) -> Option<f64> {
        match *self {
            Self::Simple { .. } => None,
            Self::Count { count, .. } => Some(count),
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Simple { .. } => "SimpleTruthValue",
            Self::Count { .. } => "CountTruthValue",
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple {
                strength,
                confidence,
            } => write!(f, "(stv {} {})", strength, confidence),
            Self::Count {
                strength,
                confidence,
                count,
            } => write!(f, "(ctv {} {} {})", strength, confidence, count),
        }
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A typed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Vector of floats. The target of `increment_count`.
    Float(Vec<f64>),
    /// Vector of strings.
    String(Vec<String>),
    /// Nested sequence of values.
    Link(Vec<ValuePtr>),
    /// Reference to an atom. Holds the atom alive.
    Atom(Handle),
    /// Truth value.
    Truth(TruthValue),
}

impl Value {
    #[must_use]
    pub fn float(values: impl Into<Vec<f64>>) -> ValuePtr {
        Arc::new(Self::Float(values.into()))
    }

    #[must_use]
    pub fn string<S: Into<String>>(values: impl IntoIterator<Item = S>) -> ValuePtr {
        Arc::new(Self::String(values.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub fn link(values: impl Into<Vec<ValuePtr>>) -> ValuePtr {
        Arc::new(Self::Link(values.into()))
    }

    #[must_use]
    pub fn atom(handle: Handle) -> ValuePtr {
        Arc::new(Self::Atom(handle))
    }

    #[must_use]
    pub fn truth(tv: TruthValue) -> ValuePtr {
        Arc::new(Self::Truth(tv))
    }

    /// Type tag of this value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "FloatValue",
            Self::String(_) => "StringValue",
            Self::Link(_) => "LinkValue",
            Self::Atom(h) => h.atom_type().name(),
            Self::Truth(tv) => tv.type_name(),
        }
    }

    #[must_use]
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_truth(&self) -> Option<TruthValue> {
        match self {
            Self::Truth(tv) => Some(*tv),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => {
                f.write_str("(FloatValue")?;
                for x in v {
                    write!(f, " {}", x)?;
                }
                f.write_str(")")
            }
            Self::String(v) => {
                f.write_str("(StringValue")?;
                for s in v {
                    write!(f, " {:?}", s)?;
                }
                f.write_str(")")
            }
            Self::Link(v) => {
                f.write_str("(LinkValue")?;
                for inner in v {
                    write!(f, " {}", inner)?;
                }
                f.write_str(")")
            }
            Self::Atom(h) => f.write_str(&h.to_short_string()),
            Self::Truth(tv) => fmt::Display::fmt(tv, f),
        }
    }
}

// =============================================================================
// TRUTH KEY
// =============================================================================

static TRUTH_KEY: LazyLock<Handle> =
    LazyLock::new(|| Atom::build_node(Arc::new(LockPool::single()), PREDICATE_NODE, TRUTH_KEY_NAME));

/// The reserved key under which truth values are stored.
///
/// Keys compare by content, so any `PredicateNode` with the same name is the
/// same key.
#[must_use]
pub fn truth_key() -> &'static Handle {
    &TRUTH_KEY
}

// =============================================================================
// READ-MODIFY-WRITE HELPERS (pure; callers hold the exclusive lock)
// =============================================================================

fn existing_floats(existing: Option<&ValuePtr>) -> Result<Vec<f64>, AtomError> {
    match existing.map(|v| v.as_ref()) {
        None => Ok(Vec::new()),
        Some(Value::Float(v)) => Ok(v.clone()),
        Some(other) => Err(AtomError::ValueTypeMismatch {
            expected: "FloatValue",
            found: other.type_name(),
        }),
    }
}

/// Element-wise addition, growing the stored vector as needed.
pub(crate) fn add_vector(
    existing: Option<&ValuePtr>,
    delta: &[f64],
) -> Result<ValuePtr, AtomError> {
    let mut counts = existing_floats(existing)?;
    if counts.len() < delta.len() {
        counts.resize(delta.len(), 0.0);
    }
    for (slot, d) in counts.iter_mut().zip(delta) {
        *slot += d;
    }
    Ok(Value::float(counts))
}

/// Add `delta` at `index`, growing the stored vector as needed.
pub(crate) fn add_at(
    existing: Option<&ValuePtr>,
    index: usize,
    delta: f64,
) -> Result<ValuePtr, AtomError> {
    let mut counts = existing_floats(existing)?;
    if counts.len() <= index {
        counts.resize(index.saturating_add(1), 0.0);
    }
    counts[index] += delta;
    Ok(Value::float(counts))
}

/// Add `delta` to the observation count, keeping strength and confidence.
pub(crate) fn add_count(
    existing: Option<&ValuePtr>,
    delta: f64,
) -> Result<TruthValue, AtomError> {
    let current = match existing.map(|v| v.as_ref()) {
        None => TruthValue::DEFAULT,
        Some(Value::Truth(tv)) => *tv,
        Some(other) => {
            return Err(AtomError::ValueTypeMismatch {
                expected: "TruthValue",
                found: other.type_name(),
            });
        }
    };
    Ok(TruthValue::count(
        current.strength(),
        current.confidence(),
        current.observations().unwrap_or(0.0) + delta,
    ))
}
