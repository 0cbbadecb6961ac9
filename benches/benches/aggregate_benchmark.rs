//! Aggregation throughput benchmarks.
//!
//! Run with: `cargo bench --package candela-bench`

use candela_bench::{BenchmarkConfig, synthetic_ticks};
use candela_lib::{
    CandleAggregator, FileStore, MemoryStore, Period, Pipeline, PipelineConfig, StoreConfig,
    StreamFeed,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::runtime::Runtime;

fn aggregator_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregator");

    for tickers in [1, 4, 64] {
        let config = BenchmarkConfig {
            tickers,
            ticks_per_ticker: 100_000 / tickers,
            ..BenchmarkConfig::default()
        };
        let ticks = synthetic_ticks(&config);
        group.throughput(Throughput::Elements(ticks.len() as u64));

        group.bench_with_input(BenchmarkId::new("1m", tickers), &ticks, |b, ticks| {
            b.iter(|| {
                let mut aggregator = CandleAggregator::new(Period::MINUTE_1);
                let mut emitted = 0usize;
                for tick in ticks {
                    if let Ok(Some(candle)) = aggregator.process(tick.clone()) {
                        emitted += black_box(&candle).tick_count as usize;
                    }
                }
                emitted + aggregator.finish().len()
            });
        });
    }

    group.finish();
}

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let config = BenchmarkConfig::default();
    let ticks = synthetic_ticks(&config);
    let pipeline_config = PipelineConfig {
        tickers: Vec::new(),
        ..PipelineConfig::default()
    };

    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ticks.len() as u64));

    group.bench_function("reference-chain/memory", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let store = Arc::new(MemoryStore::new());
                let report = Pipeline::new(pipeline_config.clone(), store)
                    .unwrap()
                    .start(StreamFeed::from_ticks(ticks.clone()))
                    .join()
                    .await
                    .unwrap();
                black_box(report)
            })
        });
    });

    group.bench_function("reference-chain/csv", |b| {
        b.iter(|| {
            let temp_dir = TempDir::new().unwrap();
            runtime.block_on(async {
                let store = FileStore::open(StoreConfig {
                    dir: temp_dir.path().to_path_buf(),
                    ..StoreConfig::default()
                })
                .await
                .unwrap();
                let report = Pipeline::new(pipeline_config.clone(), Arc::new(store))
                    .unwrap()
                    .start(StreamFeed::from_ticks(ticks.clone()))
                    .join()
                    .await
                    .unwrap();
                black_box(report)
            })
        });
    });

    group.finish();
}

criterion_group!(benches, aggregator_benchmark, pipeline_benchmark);
criterion_main!(benches);
