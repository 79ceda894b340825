use cake_common::BASE62;
use cake_core::cake::Cake;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_base62_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("base62_round_trip");
    for size in [16usize, 256, 4096] {
        let data = vec![0x42u8; size];
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let encoded = BASE62.encode(black_box(data));
                BASE62.decode(&encoded).unwrap()
            });
        });
    }
    group.finish();
}

fn bench_cake_from_bytes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cake_from_bytes");
    for size in [16usize, 32, 1024, 65_536] {
        let data = vec![0x7eu8; size];
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| Cake::from_bytes(black_box(data)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_base62_round_trip, bench_cake_from_bytes);
criterion_main!(benches);
