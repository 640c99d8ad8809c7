//! Benchmarks for streamtri
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use streamtri::graph::{Edge, StreamingTriangles};
use streamtri::io::EdgeListReader;
use streamtri::traits::TriangleSketch;

/// Random edge stream over `nodes` nodes, self-loops skipped
fn edge_stream(nodes: u64, len: usize, seed: u64) -> Vec<Edge> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(len);
    while edges.len() < len {
        if let Ok(edge) = Edge::new(rng.gen_range(0..nodes), rng.gen_range(0..nodes)) {
            edges.push(edge);
        }
    }
    edges
}

// ============================================================================
// Estimator Benchmarks
// ============================================================================

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_triangles");
    group.throughput(Throughput::Elements(1));

    let stream = edge_stream(10_000, 100_000, 42);

    for size in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("push", size), &size, |b, &size| {
            let mut st = StreamingTriangles::with_seed(size, size, 7).unwrap();
            let mut i = 0usize;
            b.iter(|| {
                black_box(st.push(stream[i % stream.len()]));
                i = i.wrapping_add(1);
            });
        });
    }

    group.finish();
}

fn bench_fill_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_triangles");

    // every edge is sampled while the edge reservoir fills
    let stream = edge_stream(500, 1_000, 3);
    group.throughput(Throughput::Elements(stream.len() as u64));

    group.bench_function("fill_1000", |b| {
        b.iter(|| {
            let mut st = StreamingTriangles::with_seed(1_000, 1_000, 7).unwrap();
            for edge in &stream {
                st.push(*edge);
            }
            black_box(st.transitivity())
        });
    });

    group.finish();
}

fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_list");

    let mut data = String::from("# FromNodeId\tToNodeId\n");
    for edge in edge_stream(100_000, 50_000, 9) {
        let (u, v) = edge.endpoints();
        data.push_str(&format!("{}\t{}\n", u, v));
    }
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("parse_50k", |b| {
        b.iter(|| {
            let n = EdgeListReader::new(data.as_bytes())
                .filter_map(Result::ok)
                .count();
            black_box(n)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_fill_phase, bench_reader);
criterion_main!(benches);
