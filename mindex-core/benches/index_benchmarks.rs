use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mindex_core::index::sort::radix_sort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mindex_core::{generate_minimizers, BTreeBucket, FnvBucket, IndexParams, MinimizerIndex};

fn generate_test_sequence(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

fn bench_params() -> IndexParams {
    IndexParams {
        k: 15,
        w: 10,
        parallel: false,
        ..Default::default()
    }
}

fn bench_generation(c: &mut Criterion) {
    let seq = generate_test_sequence(100_000, 7);
    let params = bench_params();
    let hp = IndexParams {
        homopolymer_suppression: true,
        ..bench_params()
    };

    c.bench_function("minimizers_100kb", |b| {
        b.iter(|| black_box(generate_minimizers(black_box(&seq), 0, &params)))
    });
    c.bench_function("minimizers_hpc_100kb", |b| {
        b.iter(|| black_box(generate_minimizers(black_box(&seq), 0, &hp)))
    });
}

fn bench_radix_sort(c: &mut Criterion) {
    let seq = generate_test_sequence(200_000, 11);
    let seeds = generate_minimizers(&seq, 0, &bench_params()).unwrap_or_default();

    c.bench_function("radix_sort_seeds", |b| {
        b.iter(|| {
            let mut values = seeds.clone();
            radix_sort(&mut values);
            black_box(values)
        })
    });
    c.bench_function("std_sort_seeds", |b| {
        b.iter(|| {
            let mut values = seeds.clone();
            values.sort_unstable();
            black_box(values)
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let seqs: Vec<Vec<u8>> = (0..8).map(|i| generate_test_sequence(50_000, i + 1)).collect();
    let headers: Vec<String> = (0..seqs.len()).map(|i| format!("seq{}", i)).collect();

    let mut group = c.benchmark_group("index_build");
    for parallel in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("fnv", if parallel { "parallel" } else { "serial" }),
            &parallel,
            |b, &parallel| {
                b.iter(|| {
                    let params = IndexParams {
                        parallel,
                        ..bench_params()
                    };
                    let mut index = MinimizerIndex::<FnvBucket>::new(params).unwrap();
                    index.add_sequences(&seqs[..], &headers[..]).unwrap();
                    black_box(index.build().unwrap())
                })
            },
        );
    }
    group.bench_function("btree", |b| {
        b.iter(|| {
            let mut index = MinimizerIndex::<BTreeBucket>::new(bench_params()).unwrap();
            index.add_sequences(&seqs[..], &headers[..]).unwrap();
            black_box(index.build().unwrap())
        })
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let target = generate_test_sequence(500_000, 3);
    let mut index = MinimizerIndex::<FnvBucket>::new(bench_params()).unwrap();
    index.add_sequence(&target, "target").unwrap();
    index.build().unwrap();

    let mut group = c.benchmark_group("collect_hits");
    for len in [1_000usize, 10_000] {
        let query = target[10_000..10_000 + len].to_vec();
        group.bench_with_input(BenchmarkId::from_parameter(len), &query, |b, query| {
            b.iter(|| black_box(index.collect_hits(black_box(query)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_generation,
    bench_radix_sort,
    bench_build,
    bench_query
);
criterion_main!(benches);
