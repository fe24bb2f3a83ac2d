//! Benchmarks for building, validating and copying embedded graphs.
//!
//! This benchmark suite measures the performance-critical paths of the crate:
//!
//! 1. **Construction**: random sequences of `make_edge_vertex` and
//!    `make_edge_face` grown from a seed
//! 2. **Validation**: `is_valid()` and `validation_report()` on the built graphs
//! 3. **Traversal**: full vertex and face cycle walks
//! 4. **Replication**: `copy()` and `dual_copy()`

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use planar_topology::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;
use std::sync::OnceLock;

/// Get the deterministic seed for random graph generation.
/// Reads `PLANAR_BENCH_SEED` (decimal or 0x-hex). Defaults to 0x9A7E.
/// Prints the resolved seed once on first use if `PRINT_BENCH_SEED` is set.
fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        let seed = std::env::var("PLANAR_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0x9A7E);
        if std::env::var("PRINT_BENCH_SEED").is_ok() {
            eprintln!("Benchmark seed: 0x{seed:X} ({seed})");
        }
        seed
    })
}

/// Grows a graph with `vertices` vertices from a seed.
///
/// Every third step closes a face between two random vertices of a random
/// face; the other steps add a spur at a random boundary vertex.
fn random_graph(vertices: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph: Graph = Graph::new();
    graph.make_vertex_face().unwrap();

    let mut faces: Vec<FaceKey> = graph.faces().collect();
    let mut step = 0_usize;
    while graph.number_of_vertices() < vertices {
        step += 1;
        let face = faces[rng.random_range(0..faces.len())];
        let boundary: Vec<_> = graph.face_vertex_cycle(face).collect();
        let head = boundary[rng.random_range(0..boundary.len())];
        if step % 3 == 0 {
            let tail = boundary[rng.random_range(0..boundary.len())];
            if let Ok(split) = graph.make_edge_face(face, head, tail) {
                faces.extend(split.face);
            }
        } else {
            graph.make_edge_vertex(face, head).unwrap();
        }
    }
    graph
}

fn benchmark_construction(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let seed = get_benchmark_seed();

    let mut group = c.benchmark_group("construction");
    for &n in &sizes {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("random_graph", n), &n, |b, &n| {
            b.iter(|| black_box(random_graph(n, seed)));
        });
    }
    group.finish();
}

fn benchmark_validation(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let seed = get_benchmark_seed();

    let mut group = c.benchmark_group("validation");
    for &n in &sizes {
        let graph = random_graph(n, seed);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("is_valid", n), &graph, |b, graph| {
            b.iter(|| black_box(graph.is_valid()));
        });
        group.bench_with_input(
            BenchmarkId::new("validation_report", n),
            &graph,
            |b, graph| {
                b.iter(|| black_box(graph.validation_report()));
            },
        );
    }
    group.finish();
}

fn benchmark_traversal(c: &mut Criterion) {
    let seed = get_benchmark_seed();
    let graph = random_graph(10_000, seed);

    let mut group = c.benchmark_group("traversal");
    group.bench_function("vertex_edge_cycles", |b| {
        b.iter(|| {
            graph
                .vertices()
                .map(|v| graph.vertex_edge_cycle(v).count())
                .sum::<usize>()
        });
    });
    group.bench_function("face_vertex_cycles", |b| {
        b.iter(|| {
            graph
                .faces()
                .map(|f| graph.face_vertex_cycle(f).count())
                .sum::<usize>()
        });
    });
    group.finish();
}

fn benchmark_replication(c: &mut Criterion) {
    let sizes = [1_000, 10_000];
    let seed = get_benchmark_seed();

    let mut group = c.benchmark_group("replication");
    for &n in &sizes {
        let graph = random_graph(n, seed);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("copy", n), &graph, |b, graph| {
            b.iter(|| black_box(graph.copy().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("dual_copy", n), &graph, |b, graph| {
            b.iter(|| black_box(graph.dual_copy().unwrap()));
        });
    }
    group.finish();
}

fn benchmark_split_and_merge(c: &mut Criterion) {
    let seed = get_benchmark_seed();
    let graph = random_graph(1_000, seed);

    c.bench_function("split_merge_every_edge", |b| {
        b.iter_batched(
            || graph.copy().unwrap(),
            |mut graph| {
                let edges: Vec<_> = graph.edges().collect();
                for edge in edges {
                    let split = graph.make_vertex_edge(edge).unwrap();
                    graph
                        .kill_vertex_edge(split.vertex.unwrap(), split.edge.unwrap())
                        .unwrap();
                }
                black_box(graph)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_validation,
    benchmark_traversal,
    benchmark_replication,
    benchmark_split_and_merge
);
criterion_main!(benches);
