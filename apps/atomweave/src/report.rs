//! # Command Reports
//!
//! Serializable results of the CLI commands.
//!
//! Every command builds one of these first and renders it afterwards, as
//! pretty JSON in `--json-mode` or as text otherwise.

use serde::{Deserialize, Serialize};

// =============================================================================
// DEMO
// =============================================================================

/// One atom as shown by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomJson {
    pub atom: String,
    pub hash: String,
}

/// End-to-end identity scenario: A, B, L=[A,B], remove, recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoReport {
    pub nodes: Vec<AtomJson>,
    pub link: AtomJson,
    /// Incoming set of A right after the link was installed.
    pub incoming_after_install: Vec<String>,
    /// Incoming set of A after the link was removed.
    pub incoming_after_remove: Vec<String>,
    /// True if the recreated link hashed and compared equal to the original.
    pub recreated_equal: bool,
    pub truth_value: String,
}

// =============================================================================
// STRESS
// =============================================================================

/// Concurrent increment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReport {
    pub threads: usize,
    pub increments: usize,
    pub lock_pool_size: usize,
    pub expected: f64,
    pub observed: f64,
    pub elapsed_ms: u128,
}

impl StressReport {
    /// True if no increment was lost.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        (self.expected - self.observed).abs() < f64::EPSILON
    }
}

// =============================================================================
// FRAMES
// =============================================================================

/// Frame-DAG teardown walk-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramesReport {
    /// Live children of the root before anything is dropped.
    pub root_children_before: usize,
    /// Live children of the root after one branch was dropped unremoved.
    pub root_children_after_drop: usize,
    /// Raw index entries of the root after that drop.
    pub root_entries_after_drop: usize,
    /// Raw entries left on a node by a link dropped without `remove()`.
    pub dangling_link_entries: usize,
    /// Entries removed by an explicit scrub of that node.
    pub scrubbed: usize,
    pub bottom_sees_root_atoms: bool,
    pub root_sees_bottom_atoms: bool,
}

// =============================================================================
// TYPES / CONFIG
// =============================================================================

/// One entry of the type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeJson {
    pub id: u16,
    pub name: String,
    pub kind: String,
    pub parent: Option<String>,
}

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigReport {
    pub source: String,
    pub lock_pool_size: usize,
}
