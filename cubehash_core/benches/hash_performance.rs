//! Performance benchmarks for CubeHash digests
//!
//! Measures the raw permutation across revisions and the overhead the
//! streaming engine adds on top of it.

use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cubehash_core::progress::NullProvider;
use cubehash_core::{CubeHashFactory, DigestEngine, HashParameters, HasherFactory, MemorySource};
use std::hint::black_box;
use tokio::runtime::Runtime;

/// Benchmark each revision with different input sizes
fn benchmark_revisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("cubehash_revisions");

    let sizes = vec![
        1_024,     // 1KB
        102_400,   // 100KB
        1_048_576, // 1MB
    ];

    for size in sizes {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for revision in 1..=3 {
            let params = HashParameters::new(revision, 512);
            group.bench_with_input(
                BenchmarkId::new(format!("rev{revision}"), format_size(size)),
                &data,
                |b, data| {
                    b.iter(|| {
                        let digest = CubeHashFactory.hash_bytes(params, black_box(data)).unwrap();
                        black_box(digest);
                    })
                },
            );
        }
    }

    group.finish();
}

/// Benchmark the streaming engine at different chunk sizes
fn benchmark_streaming_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_chunk_sizes");
    let rt = Runtime::new().unwrap();
    let engine = DigestEngine::default();
    let params = HashParameters::default();

    let size = 4 * 1_048_576;
    let data = Bytes::from(generate_test_data(size));
    group.throughput(Throughput::Bytes(size as u64));

    for chunk_size in [4 * 1024, 64 * 1024, 1_048_576] {
        group.bench_with_input(
            BenchmarkId::new("compute_file_digest", format_size(chunk_size)),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let mut source = MemorySource::new(data.clone(), chunk_size);
                    let record = rt
                        .block_on(engine.compute_file_digest(&mut source, params, &NullProvider))
                        .unwrap();
                    black_box(record);
                })
            },
        );
    }

    group.finish();
}

/// Benchmark engine overhead vs calling the hasher directly
fn benchmark_implementation_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("implementation_overhead");
    let rt = Runtime::new().unwrap();
    let engine = DigestEngine::default();
    let params = HashParameters::default();

    let data = Bytes::from(generate_test_data(1_048_576));
    group.throughput(Throughput::Bytes(1_048_576));

    group.bench_function("engine_stream", |b| {
        b.iter(|| {
            let mut source = MemorySource::new(data.clone(), 64 * 1024);
            let record = rt
                .block_on(engine.compute_file_digest(&mut source, params, &NullProvider))
                .unwrap();
            black_box(record);
        })
    });

    group.bench_function("raw_hasher", |b| {
        b.iter(|| {
            let mut hasher = CubeHashFactory.create(params).unwrap();
            for chunk in data.chunks(64 * 1024) {
                hasher.update(black_box(chunk));
            }
            black_box(hasher.finalize());
        })
    });

    group.finish();
}

fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 31 % 251) as u8).collect()
}

fn format_size(size: usize) -> String {
    if size >= 1_048_576 {
        format!("{}MB", size / 1_048_576)
    } else if size >= 1024 {
        format!("{}KB", size / 1024)
    } else {
        format!("{size}B")
    }
}

criterion_group!(
    benches,
    benchmark_revisions,
    benchmark_streaming_chunk_sizes,
    benchmark_implementation_overhead
);
criterion_main!(benches);
