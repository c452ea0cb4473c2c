use criterion::{black_box, criterion_group, criterion_main, Criterion};
use negamax_core::tt::TtTable;
use negamax_core::types::{Depth, Move, ValueType};

fn xorshift_stream(seed: u64) -> impl FnMut() -> u64 {
    let mut state = seed | 1;
    move || {
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

fn bench_probe_hit(c: &mut Criterion) {
    let mut tt = TtTable::new(64);
    let mut next = xorshift_stream(1);
    let keys: Vec<u64> = (0..10_000).map(|_| next()).collect();
    for &k in &keys {
        tt.put(k, Move::quiet(0, 1), 10, Depth::new(4), ValueType::Exact, false, false);
    }

    let mut i = 0usize;
    c.bench_function("tt_probe_hit", |b| {
        b.iter(|| {
            let k = keys[i % keys.len()];
            i += 1;
            black_box(tt.probe(black_box(k)))
        })
    });
}

fn bench_probe_miss(c: &mut Criterion) {
    let tt_size_mb = 1; // small table, large key space -> mostly misses
    let mut tt = TtTable::new(tt_size_mb);
    let mut next = xorshift_stream(7);

    c.bench_function("tt_probe_miss", |b| {
        b.iter(|| black_box(tt.probe(black_box(next()))))
    });
}

fn bench_put_fresh(c: &mut Criterion) {
    let mut next = xorshift_stream(42);

    c.bench_function("tt_put_fresh", |b| {
        b.iter_batched(
            || TtTable::new(64),
            |mut tt| {
                let k = next();
                tt.put(
                    black_box(k),
                    black_box(Move::quiet(2, 18)),
                    black_box(25),
                    black_box(Depth::new(6)),
                    ValueType::Exact,
                    false,
                    false,
                );
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_age_entries(c: &mut Criterion) {
    let mut tt = TtTable::new(16);
    let mut next = xorshift_stream(99);
    for _ in 0..200_000 {
        let k = next();
        tt.put(k, Move::quiet(0, 1), 0, Depth::new(2), ValueType::Exact, false, false);
    }

    c.bench_function("tt_age_entries", |b| b.iter(|| tt.age_entries()));
}

criterion_group!(
    benches,
    bench_probe_hit,
    bench_probe_miss,
    bench_put_fresh,
    bench_age_entries
);
criterion_main!(benches);
