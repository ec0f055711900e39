use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Duration;
use tempfile::TempDir;
use tome_store::{Codec, CollectionStore, JsonCodec, NullSink};
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    id: u64,
    name: String,
    tags: Vec<String>,
    body: String,
}

fn record(id: u64, body_len: usize) -> Record {
    Record {
        id,
        name: format!("record_{id}"),
        tags: vec!["bench".to_owned(), "tome".to_owned()],
        body: "x".repeat(body_len),
    }
}

fn open(rt: &Runtime, temp: &TempDir) -> CollectionStore {
    rt.block_on(async {
        CollectionStore::builder().root(temp.path()).sink(NullSink).open().await.unwrap()
    })
}

// ============================================================================
// Benchmark: Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for (name, size) in [("1KB", 1024), ("10KB", 10 * 1024), ("100KB", 100 * 1024)] {
        let value = record(1, size);
        let encoded = JsonCodec.encode(&value).unwrap();
        group.throughput(Throughput::Bytes(u64::try_from(encoded.len()).unwrap_or(u64::MAX)));

        group.bench_with_input(BenchmarkId::new("encode", name), &value, |b, value| {
            b.iter(|| black_box(JsonCodec.encode(value).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("decode", name), &encoded, |b, encoded| {
            b.iter(|| black_box(JsonCodec.decode::<Record>(encoded).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Record Operations
// ============================================================================

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let rt = Runtime::new().unwrap();
    let store = open(&rt, &temp);

    for (name, size) in [("1KB", 1024), ("10KB", 10 * 1024)] {
        let value = record(7, size);

        group.bench_with_input(BenchmarkId::new("write", name), &value, |b, value| {
            b.to_async(&rt).iter(|| async {
                store.write("bench", &format!("write_{name}"), value).await.unwrap();
            });
        });

        rt.block_on(async { store.write("bench", &format!("read_{name}"), &value).await.unwrap() });

        group.bench_function(BenchmarkId::new("read", name), |b| {
            b.to_async(&rt).iter(|| async {
                black_box(store.read::<Record>("bench", &format!("read_{name}")).await.unwrap());
            });
        });
    }

    rt.block_on(async {
        for id in 0..100 {
            store.write("scan", &format!("r{id}"), &record(id, 256)).await.unwrap();
        }
    });

    group.bench_function("read_all_100", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(store.read_all("scan").await.unwrap());
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Lock Contention
// ============================================================================

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let rt = Runtime::new().unwrap();
    let store = open(&rt, &temp);
    let value = record(1, 512);

    for (name, spread) in [("same_collection", false), ("distinct_collections", true)] {
        group.bench_function(name, |b| {
            b.to_async(&rt).iter(|| async {
                let tasks: Vec<_> = (0..8)
                    .map(|i| {
                        let store = store.clone();
                        let value = value.clone();
                        let collection =
                            if spread { format!("c{i}") } else { "shared".to_owned() };
                        tokio::spawn(async move {
                            store.write(&collection, &format!("r{i}"), &value).await
                        })
                    })
                    .collect();
                for task in tasks {
                    task.await.unwrap().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_records, bench_contention);

criterion_main!(benches);
