//! Benchmark CSV loading and query execution over generated uploads.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use csvql::loader::Loader;
use csvql::query::QueryStore;
use csvql::testutil::generate_csv;

const ROW_COUNTS: &[usize] = &[1_000, 100_000];

fn bench_load(c: &mut Criterion) {
    let loader = Loader::default();
    let mut group = c.benchmark_group("load");

    for &num_rows in ROW_COUNTS {
        let raw = generate_csv(num_rows);
        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", num_rows), &raw, |b, raw| {
            b.iter(|| black_box(loader.load(black_box(raw), "bench.csv").unwrap()))
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let loader = Loader::default();
    let mut group = c.benchmark_group("query");

    for &num_rows in ROW_COUNTS {
        let loaded = loader.load(&generate_csv(num_rows), "bench.csv").unwrap();
        let mut store = QueryStore::default();
        store.register(&loaded.name, &loaded.table).unwrap();

        group.throughput(Throughput::Elements(num_rows as u64));
        group.bench_with_input(BenchmarkId::new("group_by", num_rows), &store, |b, store| {
            b.iter(|| {
                rt.block_on(async {
                    let result = store
                        .execute(black_box(
                            "SELECT city, avg(score) AS avg_score FROM bench GROUP BY city",
                        ))
                        .await
                        .unwrap();
                    black_box(result)
                })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_query);
criterion_main!(benches);
