use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use probed_hash::HashTable as ProbedHashTable;
use probed_hash::ProbeStrategy;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

const SIZES: &[usize] = &[(1 << 8), (1 << 10), (1 << 12), (1 << 14), (1 << 16)];

const STRATEGIES: [(&str, ProbeStrategy); 2] = [
    ("linear", ProbeStrategy::Linear),
    ("quadratic", ProbeStrategy::Quadratic),
];

fn hash_key(key: i64) -> u64 {
    let mut hasher = SipHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn random_entries(size: usize, rng: &mut SmallRng) -> Vec<(i64, String)> {
    (0..size)
        .map(|_| {
            let key = rng.random::<i64>();
            (key, format!("value_{key:016X}"))
        })
        .collect()
}

fn build_table(strategy: ProbeStrategy, entries: &[(i64, String)]) -> ProbedHashTable {
    let mut table = ProbedHashTable::new(strategy);
    for (key, value) in entries {
        table.insert(*key, value.as_str()).unwrap();
    }
    table
}

fn bench_insert_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_random");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(0x5EED);

    for &size in SIZES {
        let entries = random_entries(size, &mut rng);
        group.throughput(Throughput::Elements(size as u64));

        for (name, strategy) in STRATEGIES {
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter_batched(
                    || {
                        let mut entries = entries.clone();
                        entries.shuffle(&mut SmallRng::from_os_rng());
                        entries
                    },
                    |entries| {
                        let mut table = ProbedHashTable::new(strategy);
                        for (key, value) in entries {
                            black_box(table.insert(key, value).unwrap());
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || entries.clone(),
                |entries| {
                    let mut table = HashbrownHashTable::with_capacity(0);
                    for (key, value) in entries {
                        match table.entry(
                            hash_key(key),
                            |(k, _): &(i64, String)| *k == key,
                            |(k, _)| hash_key(*k),
                        ) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert((key, value)));
                            }
                            HashbrownEntry::Occupied(mut entry) => {
                                entry.get_mut().1 = value;
                            }
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_search_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_hit");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(0xF17D);

    for &size in SIZES {
        let entries = random_entries(size, &mut rng);
        let mut lookups: Vec<i64> = entries.iter().map(|(key, _)| *key).collect();
        lookups.shuffle(&mut rng);
        group.throughput(Throughput::Elements(size as u64));

        for (name, strategy) in STRATEGIES {
            let table = build_table(strategy, &entries);
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter(|| {
                    for key in &lookups {
                        black_box(table.search(*key).unwrap());
                    }
                })
            });
        }
    }

    group.finish();
}

/// Zipf-skewed lookups over a key space twice the table size, so roughly
/// half the probes miss and walk to an empty slot.
fn bench_search_zipf(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_zipf");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::seed_from_u64(0x21BF);

    for &size in SIZES {
        let entries: Vec<(i64, String)> = (0..size as i64)
            .map(|key| (key * 2, format!("value_{key}")))
            .collect();
        let distr = Zipf::new(size as f64 * 2.0 - 1.0, 1.0).unwrap();
        let lookups: Vec<i64> = (0..size)
            .map(|_| rng.sample(distr) as i64 - 1)
            .collect();
        group.throughput(Throughput::Elements(size as u64));

        for (name, strategy) in STRATEGIES {
            let table = build_table(strategy, &entries);
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter(|| {
                    for key in &lookups {
                        black_box(table.get(*key));
                    }
                })
            });
        }
    }

    group.finish();
}

/// Interleaved inserts and removals, which leave tombstones behind between
/// rehashes.
fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let mut rng = SmallRng::seed_from_u64(size as u64);
        let operations: Vec<(bool, i64)> = (0..size * 2)
            .map(|_| (rng.random_bool(0.6), rng.random_range(0..size as i64)))
            .collect();
        group.throughput(Throughput::Elements(operations.len() as u64));

        for (name, strategy) in STRATEGIES {
            group.bench_function(format!("{name}/{size}"), |b| {
                b.iter_batched(
                    || ProbedHashTable::new(strategy),
                    |mut table| {
                        for &(insert, key) in &operations {
                            if insert {
                                black_box(table.insert(key, "v").unwrap());
                            } else {
                                black_box(table.remove(key).ok());
                            }
                        }
                        black_box(table)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_search_hit,
    bench_search_zipf,
    bench_churn,
);
criterion_main!(benches);
