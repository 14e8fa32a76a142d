use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rust_window_transforms::transforms::{
    PairStrategy, PairingOptions, ReverseOptions, pair_durations, reverse_assign,
};
use rust_window_transforms::types::{DataSet, DataType, Field, Schema, Value};

fn reversal_dataset(groups: i64, per_group: i64) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("grp", DataType::Utf8),
    ]);
    let mut rows = Vec::with_capacity((groups * per_group) as usize);
    for g in 0..groups {
        for i in 0..per_group {
            rows.push(vec![
                Value::Int64(g * per_group + i),
                Value::Utf8(format!("group-{g}")),
            ]);
        }
    }
    DataSet::new(schema, rows)
}

fn events_dataset(keys: i64) -> DataSet {
    let schema = Schema::new(vec![
        Field::new("key", DataType::Int64),
        Field::new("event_type", DataType::Utf8),
        Field::new("ts", DataType::Int64),
    ]);
    let mut rows = Vec::with_capacity((keys * 2) as usize);
    for k in 0..keys {
        rows.push(vec![
            Value::Int64(k),
            Value::Utf8("start".to_string()),
            Value::Int64(k * 10),
        ]);
        rows.push(vec![
            Value::Int64(k),
            Value::Utf8("end".to_string()),
            Value::Int64(k * 10 + 7),
        ]);
    }
    DataSet::new(schema, rows)
}

fn bench_reverse_assign(c: &mut Criterion) {
    let ds = reversal_dataset(100, 100);
    let opts = ReverseOptions::new("id", "grp");
    c.bench_function("reverse_assign 100 groups x 100 rows", |b| {
        b.iter(|| reverse_assign(black_box(&ds), &opts).unwrap())
    });
}

fn bench_pair_durations(c: &mut Criterion) {
    let ds = events_dataset(5_000);
    let agg = PairingOptions::new("key", "event_type", "ts", PairStrategy::Aggregate);
    let pairing = PairingOptions::new("key", "event_type", "ts", PairStrategy::Pairing);

    c.bench_function("pair_durations aggregate 5k keys", |b| {
        b.iter(|| pair_durations(black_box(&ds), &agg).unwrap())
    });
    c.bench_function("pair_durations pairing 5k keys", |b| {
        b.iter(|| pair_durations(black_box(&ds), &pairing).unwrap())
    });
}

criterion_group!(benches, bench_reverse_assign, bench_pair_durations);
criterion_main!(benches);
