//! # Atom Benchmarks
//!
//! Performance benchmarks for atomweave-core hot paths.
//!
//! Run with: `cargo bench -p atomweave-core`

use atomweave_core::types::{CONCEPT_NODE, LIST_LINK, PREDICATE_NODE};
use atomweave_core::{Atom, AtomSpace, Handle, LockPool, SpaceConfig};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

/// Build `size` distinct nodes.
fn create_nodes(pool: &Arc<LockPool>, size: usize) -> Vec<Handle> {
    (0..size)
        .map(|i| Atom::node(pool, CONCEPT_NODE, format!("n{}", i)).expect("node"))
        .collect()
}

/// A hub with `size` installed links pointing at it.
fn create_star(pool: &Arc<LockPool>, size: usize) -> (Handle, Vec<Handle>) {
    let hub = Atom::node(pool, CONCEPT_NODE, "hub").expect("node");
    hub.keep_incoming_set();
    let links = create_nodes(pool, size)
        .into_iter()
        .map(|spoke| {
            let link = Atom::link(pool, LIST_LINK, vec![hub.clone(), spoke]).expect("link");
            link.install();
            link
        })
        .collect();
    (hub, links)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_link_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("link_hash");
    let pool = Arc::new(LockPool::default());

    for arity in [2, 16, 128].iter() {
        let children = create_nodes(&pool, *arity);
        for child in &children {
            child.get_hash();
        }
        let link = Atom::link(&pool, LIST_LINK, children).expect("link");

        group.bench_with_input(BenchmarkId::from_parameter(arity), arity, |b, _| {
            b.iter(|| black_box(link.compute_hash()));
        });
    }

    group.finish();
}

fn bench_incoming_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("incoming_insertion");
    let pool = Arc::new(LockPool::default());

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_star(&pool, size)));
        });
    }

    group.finish();
}

fn bench_incoming_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("incoming_snapshot");
    let pool = Arc::new(LockPool::default());

    for size in [100, 1000, 10000].iter() {
        let (hub, _links) = create_star(&pool, *size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(hub.incoming_set(None)));
        });
    }

    group.finish();
}

fn bench_increment_count(c: &mut Criterion) {
    let pool = Arc::new(LockPool::default());
    let atom = Atom::node(&pool, CONCEPT_NODE, "counter").expect("node");
    let key = Atom::node(&pool, PREDICATE_NODE, "count").expect("node");

    c.bench_function("increment_count", |b| {
        b.iter(|| black_box(atom.increment_count(&key, &[1.0, 0.5])));
    });
}

fn bench_space_dedup(c: &mut Criterion) {
    let mut group = c.benchmark_group("space_add_node");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let space = AtomSpace::new(SpaceConfig::default()).expect("space");
                for i in 0..size {
                    // Every name twice: the second add hits the dedup path.
                    let _ = space.add_node(CONCEPT_NODE, format!("n{}", i % (size / 2)));
                }
                black_box(space)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_link_hash,
    bench_incoming_insertion,
    bench_incoming_snapshot,
    bench_increment_count,
    bench_space_dedup,
);
criterion_main!(benches);
