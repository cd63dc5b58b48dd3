//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Each command is split in two: a `run_*` function that drives the store
//! and returns a report, and a `cmd_*` function that renders it.

use crate::config::LoadedConfig;
use crate::report::{
    AtomJson, ConfigReport, DemoReport, FramesReport, StressReport, TypeJson,
};
use atomweave_core::types::{CONCEPT_NODE, LIST_LINK, PREDICATE_NODE};
use atomweave_core::{
    Atom, AtomError, AtomSpace, Frame, Handle, LockPool, SpaceConfig, TruthValue, TypeTable,
};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Upper bound on stress writer threads.
const MAX_STRESS_THREADS: usize = 256;

/// Largest total count an `f64` counter holds exactly.
const MAX_STRESS_TOTAL: u64 = 1 << 53;

fn print_json<T: Serialize>(report: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(report).unwrap_or_default()
    );
}

fn atom_json(handle: &Handle) -> AtomJson {
    AtomJson {
        atom: handle.to_short_string(),
        hash: handle.get_hash().to_string(),
    }
}

fn short_strings(handles: &[Handle]) -> Vec<String> {
    handles.iter().map(|h| h.to_short_string()).collect()
}

// =============================================================================
// DEMO COMMAND
// =============================================================================

/// A, B, L=[A,B]; install, remove, recreate.
pub fn run_demo(config: &SpaceConfig) -> Result<DemoReport, AtomError> {
    let space = AtomSpace::new(*config)?;
    let a = space.add_node(CONCEPT_NODE, "A")?;
    let b = space.add_node(CONCEPT_NODE, "B")?;
    let link = space.add_link(LIST_LINK, vec![a.clone(), b.clone()])?;
    let incoming_after_install = short_strings(&a.incoming_set(None));

    space.remove_atom(&link, false)?;
    let incoming_after_remove = short_strings(&a.incoming_set(None));

    let recreated = space.add_link(LIST_LINK, vec![a.clone(), b.clone()])?;
    let incoming = a.incoming_set(None);
    let recreated_equal = recreated == link
        && recreated.get_hash() == link.get_hash()
        && incoming.len() == 1
        && incoming.iter().all(|h| Handle::ptr_eq(h, &recreated));

    a.set_truth_value(TruthValue::simple(0.9, 0.8));
    let tv = a.increment_count_tv(1.0)?;

    Ok(DemoReport {
        nodes: vec![atom_json(&a), atom_json(&b)],
        link: atom_json(&recreated),
        incoming_after_install,
        incoming_after_remove,
        recreated_equal,
        truth_value: tv.to_string(),
    })
}

/// Run and print the demo scenario.
pub fn cmd_demo(config: &SpaceConfig, json_mode: bool) -> Result<(), AtomError> {
    let report = run_demo(config)?;

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("atomweave Demo");
    println!("==============");
    for node in &report.nodes {
        println!("Node:     {}  [{}]", node.atom, node.hash);
    }
    println!("Link:     {}  [{}]", report.link.atom, report.link.hash);
    println!();
    println!("Incoming of A after install:");
    for atom in &report.incoming_after_install {
        println!("  {}", atom);
    }
    println!(
        "Incoming of A after remove: {} entries",
        report.incoming_after_remove.len()
    );
    println!("Recreated link identical:   {}", report.recreated_equal);
    println!("Truth value of A:           {}", report.truth_value);

    Ok(())
}

// =============================================================================
// STRESS COMMAND
// =============================================================================

/// Increment one counter from `threads` threads, `increments` times each.
pub fn run_stress(
    config: &SpaceConfig,
    threads: usize,
    increments: usize,
) -> Result<StressReport, AtomError> {
    if threads == 0 || threads > MAX_STRESS_THREADS {
        return Err(AtomError::Config(format!(
            "threads must be in 1..={}, got {}",
            MAX_STRESS_THREADS, threads
        )));
    }
    let total = threads
        .checked_mul(increments)
        .filter(|total| *total as u64 <= MAX_STRESS_TOTAL)
        .ok_or_else(|| {
            AtomError::Config(format!(
                "threads * increments must not exceed {}, got {} * {}",
                MAX_STRESS_TOTAL, threads, increments
            ))
        })?;

    let pool = Arc::new(LockPool::new(config.lock_pool_size)?);
    let atom = Atom::node(&pool, CONCEPT_NODE, "counter")?;
    let key = Atom::node(&pool, PREDICATE_NODE, "count")?;

    tracing::info!(threads, increments, "stress run started");
    let started = Instant::now();
    thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| -> Result<(), AtomError> {
                    for _ in 0..increments {
                        atom.increment_count(&key, &[1.0])?;
                    }
                    Ok(())
                })
            })
            .collect();
        workers.into_iter().try_for_each(|worker| {
            worker.join().map_err(|_| {
                AtomError::InvalidConstruction("stress worker thread panicked".to_string())
            })?
        })
    })?;
    let elapsed_ms = started.elapsed().as_millis();

    let observed = atom
        .get_value(&key)
        .and_then(|v| v.as_floats().and_then(|f| f.first().copied()))
        .unwrap_or(0.0);

    Ok(StressReport {
        threads,
        increments,
        lock_pool_size: pool.len(),
        expected: total as f64,
        observed,
        elapsed_ms,
    })
}

/// Run and print the stress test.
pub fn cmd_stress(
    config: &SpaceConfig,
    json_mode: bool,
    threads: usize,
    increments: usize,
) -> Result<(), AtomError> {
    let report = run_stress(config, threads, increments)?;
    if !report.is_consistent() {
        tracing::error!(
            expected = report.expected,
            observed = report.observed,
            "lost updates detected"
        );
    }

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("atomweave Stress");
    println!("================");
    println!("Threads:    {}", report.threads);
    println!("Increments: {} per thread", report.increments);
    println!("Lock pool:  {} locks", report.lock_pool_size);
    println!();
    println!("Expected:   {}", report.expected);
    println!("Observed:   {}", report.observed);
    println!("Elapsed:    {} ms", report.elapsed_ms);
    println!(
        "Result:     {}",
        if report.is_consistent() { "OK" } else { "LOST UPDATES" }
    );

    Ok(())
}

// =============================================================================
// FRAMES COMMAND
// =============================================================================

/// Build a diamond of frames, drop one branch and report what remains.
pub fn run_frames(config: &SpaceConfig) -> Result<FramesReport, AtomError> {
    let pool = Arc::new(LockPool::new(config.lock_pool_size)?);
    let root = Frame::new(&pool, &[])?;
    let left = Frame::new(&pool, &[root.clone()])?;
    let right = Frame::new(&pool, &[root.clone()])?;
    let bottom = Frame::new(&pool, &[left.clone(), right.clone()])?;

    let shared = Atom::node(&pool, CONCEPT_NODE, "shared")?;
    shared.set_owning_context(Some(&root));
    let local = Atom::node(&pool, CONCEPT_NODE, "local")?;
    local.set_owning_context(Some(&bottom));
    let bottom_sees_root_atoms = bottom.in_environ(&shared);
    let root_sees_bottom_atoms = root.in_environ(&local);

    let root_children_before = root.children().len();

    // Abandon the left branch without calling remove().
    drop(bottom);
    drop(left);
    let root_children_after_drop = root.children().len();
    let root_entries_after_drop = root.incoming_entry_count();

    let hub = Atom::node(&pool, CONCEPT_NODE, "hub")?;
    hub.keep_incoming_set();
    {
        let link = Atom::link(&pool, LIST_LINK, vec![hub.clone()])?;
        link.install();
    }
    let dangling_link_entries = hub.incoming_entry_count();
    let scrubbed = hub.scrub_incoming_set();

    Ok(FramesReport {
        root_children_before,
        root_children_after_drop,
        root_entries_after_drop,
        dangling_link_entries,
        scrubbed,
        bottom_sees_root_atoms,
        root_sees_bottom_atoms,
    })
}

/// Run and print the frame walk-through.
pub fn cmd_frames(config: &SpaceConfig, json_mode: bool) -> Result<(), AtomError> {
    let report = run_frames(config)?;

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("atomweave Frames");
    println!("================");
    println!("Root children before drop:  {}", report.root_children_before);
    println!("Root children after drop:   {}", report.root_children_after_drop);
    println!("Root entries after drop:    {}", report.root_entries_after_drop);
    println!();
    println!("Dangling link entries:      {}", report.dangling_link_entries);
    println!("Scrubbed:                   {}", report.scrubbed);
    println!();
    println!("Bottom sees root atoms:     {}", report.bottom_sees_root_atoms);
    println!("Root sees bottom atoms:     {}", report.root_sees_bottom_atoms);

    Ok(())
}

// =============================================================================
// TYPES COMMAND
// =============================================================================

/// Every built-in type, in id order.
pub fn run_types() -> Vec<TypeJson> {
    TypeTable::builtin()
        .iter()
        .map(|ty| TypeJson {
            id: ty.id(),
            name: ty.name().to_string(),
            kind: ty.kind().to_string(),
            parent: ty.parent().map(|p| p.name().to_string()),
        })
        .collect()
}

/// Print the type table.
pub fn cmd_types(json_mode: bool) -> Result<(), AtomError> {
    let types = run_types();

    if json_mode {
        print_json(&types);
        return Ok(());
    }

    println!("{:>5}  {:<18} {:<6} PARENT", "ID", "NAME", "KIND");
    for ty in &types {
        println!(
            "{:>5}  {:<18} {:<6} {}",
            ty.id,
            ty.name,
            ty.kind,
            ty.parent.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Print the effective configuration.
pub fn cmd_config(loaded: &LoadedConfig, json_mode: bool) -> Result<(), AtomError> {
    let report = ConfigReport {
        source: loaded.source.clone(),
        lock_pool_size: loaded.space.lock_pool_size,
    };

    if json_mode {
        print_json(&report);
        return Ok(());
    }

    println!("atomweave Configuration");
    println!("=======================");
    println!("Source:         {}", report.source);
    println!("Lock pool size: {}", report.lock_pool_size);

    Ok(())
}
