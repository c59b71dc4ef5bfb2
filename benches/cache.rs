use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use perfkit::cache::BoundedCache;
use perfkit::traits::LruCacheTrait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn filled(capacity: usize) -> BoundedCache<u64, u64> {
    let mut cache = BoundedCache::try_new(capacity).unwrap();
    for i in 0..capacity as u64 {
        cache.set(i, i);
    }
    cache
}

fn bench_cache_set_get(c: &mut Criterion) {
    c.bench_function("cache_set_get", |b| {
        b.iter_batched(
            || filled(1024),
            |mut cache| {
                for i in 0..1024u64 {
                    cache.set(std::hint::black_box(i + 10_000), i);
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cache_eviction_churn(c: &mut Criterion) {
    c.bench_function("cache_eviction_churn", |b| {
        b.iter_batched(
            || filled(1024),
            |mut cache| {
                for i in 0..4096u64 {
                    cache.set(std::hint::black_box(10_000 + i), i);
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cache_random_hits(c: &mut Criterion) {
    c.bench_function("cache_random_hits", |b| {
        b.iter_batched(
            || {
                let rng = StdRng::seed_from_u64(42);
                (filled(4096), rng)
            },
            |(mut cache, mut rng)| {
                for _ in 0..4096 {
                    let key = rng.gen_range(0..8192u64);
                    if cache.get(&key).is_none() {
                        cache.set(key, key);
                    }
                }
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_cache_stats(c: &mut Criterion) {
    let mut cache = filled(4096);
    for i in (0..4096u64).step_by(3) {
        cache.get(&i);
    }
    c.bench_function("cache_stats", |b| {
        b.iter(|| std::hint::black_box(cache.stats()))
    });
}

fn bench_cache_pop_lru(c: &mut Criterion) {
    c.bench_function("cache_pop_lru", |b| {
        b.iter_batched(
            || filled(1024),
            |mut cache| {
                for _ in 0..1024 {
                    let _ = std::hint::black_box(cache.pop_lru());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_cache_set_get,
    bench_cache_eviction_churn,
    bench_cache_random_hits,
    bench_cache_stats,
    bench_cache_pop_lru
);
criterion_main!(benches);
