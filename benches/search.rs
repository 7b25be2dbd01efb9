//! Benchmarks for the enumeration hot paths: canonicalization, the
//! isomorphism search, the T_k oracle, and the edge-set generator.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kpdg::edge_gen::EdgeGenerator;
use kpdg::fraction::Fraction;
use kpdg::graph::Graph;
use kpdg::search::{run_search, SearchConfig};

fn bench_canonicalize(c: &mut Criterion) {
    let g =
        Graph::<3, 7>::parse_edges("{012>0, 013>3, 024>4, 025>0, 045>4, 145>5, 245>4, 345>4}")
            .unwrap();
    c.bench_function("canonicalize_8_edges", |b| {
        b.iter(|| {
            let mut copy = black_box(g);
            copy.canonicalize();
            copy
        });
    });
}

fn bench_is_isomorphic(c: &mut Criterion) {
    // Isomorphic but not identical: forces the permutation search.
    let mut g = Graph::<3, 5>::parse_edges("{013>3, 023, 123, 014, 024>4, 124}").unwrap();
    let mut h = Graph::<3, 5>::parse_edges("{013, 023>3, 123, 014>4, 024, 124}").unwrap();
    g.canonicalize();
    h.canonicalize();
    c.bench_function("is_isomorphic_permutation_search", |b| {
        b.iter(|| black_box(&g).is_isomorphic(black_box(&h)));
    });
}

fn bench_contains_tk(c: &mut Criterion) {
    let g =
        Graph::<3, 7>::parse_edges("{012>0, 013>3, 024>4, 025>0, 045>4, 145>5, 245>4, 345>4}")
            .unwrap();
    c.bench_function("contains_tk_8_edges", |b| {
        b.iter(|| {
            let mut any = false;
            for v in 0..7 {
                any |= black_box(&g).contains_tk(v);
            }
            any
        });
    });
}

fn bench_edge_generator(c: &mut Criterion) {
    let base = Graph::<3, 5>::parse_edges("{012, 013>1}").unwrap();
    c.bench_function("edge_generator_full_enumeration", |b| {
        b.iter(|| {
            let mut gen = EdgeGenerator::new(5, black_box(&base));
            let mut out = Graph::new();
            let mut count = 0u64;
            while gen.next(&mut out, false, 0, 0, Fraction::infinity()) {
                count += 1;
            }
            count
        });
    });
}

fn bench_small_search(c: &mut Criterion) {
    let cfg = SearchConfig { quiet: true };
    c.bench_function("run_search_2_4", |b| {
        b.iter(|| run_search::<2, 4>(black_box(&cfg)));
    });
}

criterion_group!(
    benches,
    bench_canonicalize,
    bench_is_isomorphic,
    bench_contains_tk,
    bench_edge_generator,
    bench_small_search
);
criterion_main!(benches);
