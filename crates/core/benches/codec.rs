//! Compression and decompression throughput across word widths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use huffword_core::{compress, decompress, WordLength};

const SIZE: usize = 256 * 1024;

/// Text over a small alphabet with occasional random bytes.
fn text_like(seed: u64, size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let alphabet = b"etaoin shrdlu cmfwyp";
    (0..size)
        .map(|_| {
            if rng.gen_ratio(1, 50) {
                rng.gen()
            } else {
                alphabet[rng.gen_range(0..alphabet.len())]
            }
        })
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let data = text_like(1, SIZE);
    let mut group = c.benchmark_group("compress");
    group.throughput(Throughput::Bytes(SIZE as u64));

    for word_length in WordLength::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(word_length), &data, |b, data| {
            b.iter(|| compress(black_box(data), word_length))
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let data = text_like(2, SIZE);
    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(SIZE as u64));

    for word_length in WordLength::ALL {
        let container = match compress(&data, word_length) {
            Ok(container) => container,
            Err(e) => panic!("compression failed: {e}"),
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(word_length),
            &container,
            |b, container| b.iter(|| decompress(black_box(container))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
