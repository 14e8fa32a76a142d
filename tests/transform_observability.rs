use std::sync::{Arc, Mutex};

use rust_window_transforms::observability::{
    TransformContext, TransformKind, TransformObserver, TransformStats,
};
use rust_window_transforms::transforms::{
    DegenerateKeyPolicy, PairStrategy, PairingOptions, ReverseOptions, pair_durations,
    reverse_assign,
};
use rust_window_transforms::types::{DataSet, DataType, Field, Schema, Value};
use rust_window_transforms::{PairingErrorKind, TransformError};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(TransformKind, TransformStats)>>,
    failures: Mutex<Vec<String>>,
    skipped: Mutex<Vec<(Value, PairingErrorKind)>>,
}

impl TransformObserver for RecordingObserver {
    fn on_success(&self, ctx: &TransformContext, stats: TransformStats) {
        self.successes.lock().unwrap().push((ctx.transform, stats));
    }

    fn on_failure(&self, _ctx: &TransformContext, error: &TransformError) {
        self.failures.lock().unwrap().push(error.to_string());
    }

    fn on_skipped_key(&self, _ctx: &TransformContext, key: &Value, kind: PairingErrorKind) {
        self.skipped.lock().unwrap().push((key.clone(), kind));
    }
}

fn events_dataset() -> DataSet {
    let schema = Schema::new(vec![
        Field::new("session_id", DataType::Int64),
        Field::new("event_type", DataType::Utf8),
        Field::new("ts", DataType::Int64),
    ]);
    DataSet::new(
        schema,
        vec![
            vec![
                Value::Int64(1),
                Value::Utf8("start".to_string()),
                Value::Int64(10),
            ],
            vec![
                Value::Int64(1),
                Value::Utf8("end".to_string()),
                Value::Int64(20),
            ],
            vec![
                Value::Int64(2),
                Value::Utf8("start".to_string()),
                Value::Int64(15),
            ],
        ],
    )
}

#[test]
fn observer_receives_success_stats() {
    let schema = Schema::new(vec![
        Field::new("id", DataType::Int64),
        Field::new("grp", DataType::Utf8),
    ]);
    let ds = DataSet::new(
        schema,
        vec![
            vec![Value::Int64(1), Value::Utf8("a".to_string())],
            vec![Value::Int64(2), Value::Utf8("a".to_string())],
            vec![Value::Int64(3), Value::Utf8("b".to_string())],
        ],
    );

    let obs = Arc::new(RecordingObserver::default());
    let opts = ReverseOptions::new("id", "grp").with_observer(obs.clone());
    reverse_assign(&ds, &opts).unwrap();

    let successes = obs.successes.lock().unwrap();
    assert_eq!(successes.len(), 1);
    let (kind, stats) = successes[0];
    assert_eq!(kind, TransformKind::ReverseAssign);
    assert_eq!(stats.rows_in, 3);
    assert_eq!(stats.rows_out, 3);
    assert_eq!(stats.groups, 2);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_failure() {
    let ds = events_dataset();
    let obs = Arc::new(RecordingObserver::default());
    let opts = PairingOptions::new("session_id", "event_type", "ts", PairStrategy::Pairing)
        .with_observer(obs.clone());

    let _ = pair_durations(&ds, &opts).unwrap_err();

    let failures = obs.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("no end event"));
    assert!(obs.successes.lock().unwrap().is_empty());
}

#[test]
fn observer_receives_each_skipped_key() {
    let ds = events_dataset();
    let obs = Arc::new(RecordingObserver::default());
    let opts = PairingOptions::new("session_id", "event_type", "ts", PairStrategy::Pairing)
        .with_policy(DegenerateKeyPolicy::Skip)
        .with_observer(obs.clone());

    let out = pair_durations(&ds, &opts).unwrap();
    assert_eq!(out.dataset.row_count(), 1);

    let skipped = obs.skipped.lock().unwrap();
    assert_eq!(
        *skipped,
        vec![(Value::Int64(2), PairingErrorKind::MissingEnd)]
    );

    // Skipping keys still counts as a successful run.
    let successes = obs.successes.lock().unwrap();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].1.groups, 2);
    assert_eq!(successes[0].1.rows_out, 1);
}

#[test]
fn no_observer_means_no_reporting_machinery() {
    // Pure call path: identical results with and without an observer attached.
    let ds = events_dataset();
    let obs = Arc::new(RecordingObserver::default());

    let plain = PairingOptions::new("session_id", "event_type", "ts", PairStrategy::Aggregate);
    let observed = plain.clone().with_observer(obs);

    let a = pair_durations(&ds, &plain).unwrap();
    let b = pair_durations(&ds, &observed).unwrap();
    assert_eq!(a, b);
}
