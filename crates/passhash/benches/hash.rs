use blake2::Digest as _;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::hint::black_box;

use passhash::hash::blake2b::blake2b;
use passhash::hash::digest::DigestAlgorithm;

fn data(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut res = vec![0; size];
    rng.fill_bytes(&mut res);
    res
}

fn bench_blake2b(c: &mut Criterion) {
    let mut group = c.benchmark_group("blake2b");

    for size in [1, 32, 1024, 16 * 1024, 1024 * 1024] {
        group.bench_with_input(BenchmarkId::new("passhash", size), &size, |b, &size| {
            let data = data(size, 42);
            b.iter(|| black_box(blake2b(64, &[&data])));
        });
        group.bench_with_input(BenchmarkId::new("rustcrypto", size), &size, |b, &size| {
            let data = data(size, 42);
            b.iter(|| black_box(blake2::Blake2b512::digest(&data)));
        });
    }
}

fn bench_digest(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for algorithm in [DigestAlgorithm::Sha256, DigestAlgorithm::Sha512] {
        for size in [32, 16 * 1024] {
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), size),
                &size,
                |b, &size| {
                    let data = data(size, 42);
                    b.iter(|| black_box(algorithm.digest(&data)));
                },
            );
        }
    }
}

criterion_group!(benches, bench_blake2b, bench_digest);
criterion_main!(benches);
