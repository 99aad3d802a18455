//! Benchmark: flatten and visibility resolution on large trees.
//!
//! Run with: `cargo bench -p arbor-widgets --bench visibility_bench`
//!
//! Every render re-resolves visibility from the cached flatten output, so
//! `resolve_visible_indices` is the per-frame cost that matters. Flatten
//! only runs when the node list is replaced.

use std::hint::black_box;

use arbor_widgets::flatten::flatten;
use arbor_widgets::visibility::{ExpandOverrides, FilterMatcher, resolve_visible_indices};
use arbor_widgets::{FlatEntry, Node};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// A balanced tree with `fanout` children per branch, `depth` levels deep.
fn balanced(fanout: usize, depth: usize, prefix: &str) -> Vec<Node> {
    (0..fanout)
        .map(|i| {
            let label = format!("{prefix}{i}");
            let node = Node::new(label.clone()).with_expanded(i % 2 == 0);
            if depth == 0 {
                node
            } else {
                node.with_children(balanced(fanout, depth - 1, &format!("{label}.")))
            }
        })
        .collect()
}

fn all_expanded(flat: &[FlatEntry]) -> ExpandOverrides {
    flat.iter()
        .filter(|e| e.is_branch())
        .map(|e| (e.path.clone(), true))
        .collect()
}

// ===========================================================================
// Flatten
// ===========================================================================

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");
    for (fanout, depth) in [(10, 2), (10, 3), (6, 5)] {
        let nodes = balanced(fanout, depth, "n");
        let total = flatten(&nodes).len();
        group.bench_with_input(BenchmarkId::from_parameter(total), &nodes, |b, nodes| {
            b.iter(|| black_box(flatten(black_box(nodes))));
        });
    }
    group.finish();
}

// ===========================================================================
// Visibility
// ===========================================================================

fn bench_visibility(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_visible");
    let matcher = FilterMatcher::Substring;
    for (fanout, depth) in [(10, 3), (6, 5)] {
        let flat = flatten(&balanced(fanout, depth, "n"));
        let total = flat.len();
        let defaults = ExpandOverrides::new();
        let expanded = all_expanded(&flat);

        group.bench_with_input(BenchmarkId::new("defaults", total), &flat, |b, flat| {
            b.iter(|| black_box(resolve_visible_indices(flat, &defaults, "", &matcher)));
        });
        group.bench_with_input(BenchmarkId::new("all_expanded", total), &flat, |b, flat| {
            b.iter(|| black_box(resolve_visible_indices(flat, &expanded, "", &matcher)));
        });
        group.bench_with_input(BenchmarkId::new("filtered", total), &flat, |b, flat| {
            b.iter(|| black_box(resolve_visible_indices(flat, &expanded, "3.1", &matcher)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_flatten, bench_visibility);
criterion_main!(benches);
