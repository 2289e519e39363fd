use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use redblack_tree::{RedBlackQueue, RedBlackTree};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_orders() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

fn build_tree(keys: &[i64]) -> RedBlackTree<i64, i64> {
    let mut tree = RedBlackTree::with_capacity(keys.len());
    for &k in keys {
        // Random sequences may repeat a key; the first insert wins.
        let _ = tree.insert(k, k);
    }
    tree
}

fn build_btree(keys: &[i64]) -> BTreeMap<i64, i64> {
    let mut map = BTreeMap::new();
    for &k in keys {
        map.entry(k).or_insert(k);
    }
    map
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let mut group = c.benchmark_group(format!("map_insert_{order}"));

        group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
            b.iter(|| {
                let mut tree = RedBlackTree::new();
                for &k in &keys {
                    let _ = tree.insert(k, k);
                }
                tree
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &k in &keys {
                    map.entry(k).or_insert(k);
                }
                map
            });
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let tree = build_tree(&keys);
        let map = build_btree(&keys);

        let mut group = c.benchmark_group(format!("map_get_{order}"));

        group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Ok(&v) = tree.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for &k in &keys {
                    if let Some(&v) = map.get(&k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.finish();
    }
}

/// Repeated lookups of one key, served from the last-found node after the first.
fn bench_map_get_repeated(c: &mut Criterion) {
    let keys = random_keys(N);
    let tree = build_tree(&keys);
    let map = build_btree(&keys);
    let key = keys[N / 2];

    let mut group = c.benchmark_group("map_get_repeated");

    group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for _ in 0..N {
                sum = sum.wrapping_add(*tree.get(black_box(&key)).unwrap_or(&0));
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for _ in 0..N {
                sum = sum.wrapping_add(*map.get(black_box(&key)).unwrap_or(&0));
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_remove(c: &mut Criterion) {
    for (order, keys) in key_orders() {
        let mut group = c.benchmark_group(format!("map_remove_{order}"));

        group.bench_function(BenchmarkId::new("RedBlackTree", N), |b| {
            b.iter_batched(
                || build_tree(&keys),
                |mut tree| {
                    for &k in &keys {
                        tree.remove(&k);
                    }
                    tree
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || build_btree(&keys),
                |mut map| {
                    for &k in &keys {
                        map.remove(&k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

// ─── Queue Benchmarks ───────────────────────────────────────────────────────

fn bench_queue_round_trip(c: &mut Criterion) {
    let priorities: Vec<u8> = random_keys(N).into_iter().map(|k| (k % 256) as u8).collect();
    let mut group = c.benchmark_group("queue_round_trip");

    group.bench_function(BenchmarkId::new("RedBlackQueue", N), |b| {
        b.iter(|| {
            let queue = RedBlackQueue::new();
            for (item, &priority) in priorities.iter().enumerate() {
                queue.enqueue_with_priority(item, priority);
            }
            let mut sum = 0usize;
            while let Ok(item) = queue.dequeue() {
                sum = sum.wrapping_add(item);
            }
            sum
        });
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(map_insert_benches, bench_map_insert);

criterion_group!(map_get_benches, bench_map_get, bench_map_get_repeated);

criterion_group!(map_remove_benches, bench_map_remove);

criterion_group!(queue_benches, bench_queue_round_trip);

criterion_main!(map_insert_benches, map_get_benches, map_remove_benches, queue_benches);
