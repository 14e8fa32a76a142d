//! Start/end event pairing.
//!
//! Rows tagged as start or end events are matched up by a pairing key, and each key yields the
//! elapsed interval between its two events. Two strategies are supported, selected explicitly
//! through [`PairStrategy`]:
//!
//! - [`PairStrategy::Aggregate`] computes `max(end times) - min(start times)` per key with
//!   null-propagating semantics: a key missing either side gets a `Null` duration. Use it when
//!   only the number is needed.
//! - [`PairStrategy::Pairing`] requires exactly one start and one end row per key and emits a
//!   merged record carrying every field of both rows plus the duration. Use it when fields
//!   recorded on only one side (an actor on the start row, a status on the end row) must
//!   survive into the result.
//!
//! On well-formed input both strategies produce identical durations.

use std::fmt;
use std::sync::Arc;

use crate::error::{PairingErrorKind, TransformError, TransformResult};
use crate::grouping::{RowGroup, group_rows};
use crate::observability::{TransformContext, TransformKind, TransformObserver, TransformStats};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// How per-key durations are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStrategy {
    /// `max(end times) - min(start times)` per key; missing sides yield a `Null` duration.
    Aggregate,
    /// Exactly one start and one end row per key; merges both rows' fields into the result.
    Pairing,
}

/// What to do when the pairing strategy cannot pair a key's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateKeyPolicy {
    /// Fail the whole call on the first degenerate key.
    Abort,
    /// Drop the key from the output and record it in [`PairingOutcome::skipped`].
    Skip,
}

/// Options for [`pair_durations`].
#[derive(Clone)]
pub struct PairingOptions {
    /// Name of the column that associates a start row with its end row.
    pub key_field: String,
    /// Name of the `Utf8` column holding the event tag.
    pub type_field: String,
    /// Name of the numeric column holding the event time.
    pub time_field: String,
    /// Duration computation strategy.
    pub strategy: PairStrategy,
    /// Degenerate-key handling for the pairing strategy.
    pub on_degenerate: DegenerateKeyPolicy,
    /// Tag value marking a start event.
    pub start_tag: String,
    /// Tag value marking an end event.
    pub end_tag: String,
    /// Optional observer for outcome reporting.
    pub observer: Option<Arc<dyn TransformObserver>>,
}

impl PairingOptions {
    /// Create options for the given columns and strategy.
    ///
    /// Defaults: tags `"start"`/`"end"`, [`DegenerateKeyPolicy::Abort`], no observer.
    pub fn new(
        key_field: impl Into<String>,
        type_field: impl Into<String>,
        time_field: impl Into<String>,
        strategy: PairStrategy,
    ) -> Self {
        Self {
            key_field: key_field.into(),
            type_field: type_field.into(),
            time_field: time_field.into(),
            strategy,
            on_degenerate: DegenerateKeyPolicy::Abort,
            start_tag: "start".to_string(),
            end_tag: "end".to_string(),
            observer: None,
        }
    }

    /// Set the degenerate-key policy.
    pub fn with_policy(mut self, policy: DegenerateKeyPolicy) -> Self {
        self.on_degenerate = policy;
        self
    }

    /// Override the start/end tag spellings.
    pub fn with_tags(mut self, start_tag: impl Into<String>, end_tag: impl Into<String>) -> Self {
        self.start_tag = start_tag.into();
        self.end_tag = end_tag.into();
        self
    }

    /// Attach an observer for outcome reporting.
    pub fn with_observer(mut self, observer: Arc<dyn TransformObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl fmt::Debug for PairingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingOptions")
            .field("key_field", &self.key_field)
            .field("type_field", &self.type_field)
            .field("time_field", &self.time_field)
            .field("strategy", &self.strategy)
            .field("on_degenerate", &self.on_degenerate)
            .field("start_tag", &self.start_tag)
            .field("end_tag", &self.end_tag)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// A key the pairing strategy dropped under [`DegenerateKeyPolicy::Skip`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedKey {
    /// The pairing-key value.
    pub key: Value,
    /// Why the key could not be paired.
    pub kind: PairingErrorKind,
}

/// Result of [`pair_durations`].
#[derive(Debug, Clone, PartialEq)]
pub struct PairingOutcome {
    /// Per-key results, one row per key in first-appearance order.
    ///
    /// Aggregate strategy: schema `[key, duration]`, `Null` duration for keys missing a side.
    /// Pairing strategy: schema `[key, start_<f>..., end_<f>..., duration]` over every non-key
    /// input field `f`.
    pub dataset: DataSet,
    /// Keys dropped by the pairing strategy under the skip policy; always empty for the
    /// aggregate strategy.
    pub skipped: Vec<SkippedKey>,
}

/// Compute per-key durations between start- and end-tagged events.
///
/// Rows whose tag cell is not a `Utf8` equal to the start or end tag are ignored by both
/// strategies. Every key observed in the input appears in the aggregate output; the pairing
/// output carries only well-formed keys, with degenerate keys handled per
/// [`PairingOptions::on_degenerate`].
///
/// # Errors
///
/// - [`TransformError::InvalidColumn`] if any named column is missing.
/// - [`TransformError::TypeMismatch`] if a time cell that participates in a duration is not
///   numeric (the aggregate strategy skips `Null` times; the pairing strategy requires concrete
///   times on both rows).
/// - [`TransformError::Pairing`] from the pairing strategy under
///   [`DegenerateKeyPolicy::Abort`] when a key has no start row, no end row, or more than one
///   of either.
pub fn pair_durations(
    dataset: &DataSet,
    options: &PairingOptions,
) -> TransformResult<PairingOutcome> {
    let ctx = TransformContext {
        transform: TransformKind::PairDurations,
    };

    match pair_durations_impl(dataset, options, &ctx) {
        Ok((outcome, groups)) => {
            if let Some(obs) = &options.observer {
                obs.on_success(
                    &ctx,
                    TransformStats {
                        rows_in: dataset.row_count(),
                        rows_out: outcome.dataset.row_count(),
                        groups,
                    },
                );
            }
            Ok(outcome)
        }
        Err(err) => {
            if let Some(obs) = &options.observer {
                obs.on_failure(&ctx, &err);
            }
            Err(err)
        }
    }
}

fn pair_durations_impl(
    dataset: &DataSet,
    options: &PairingOptions,
    ctx: &TransformContext,
) -> TransformResult<(PairingOutcome, usize)> {
    let key_idx = column_index(dataset, &options.key_field)?;
    let type_idx = column_index(dataset, &options.type_field)?;
    let time_idx = column_index(dataset, &options.time_field)?;

    let groups = group_rows(dataset, key_idx);
    let group_count = groups.len();

    let outcome = match options.strategy {
        PairStrategy::Aggregate => PairingOutcome {
            dataset: run_aggregate(dataset, &groups, key_idx, type_idx, time_idx, options)?,
            skipped: Vec::new(),
        },
        PairStrategy::Pairing => {
            run_pairing(dataset, &groups, key_idx, type_idx, time_idx, options, ctx)?
        }
    };

    Ok((outcome, group_count))
}

fn column_index(dataset: &DataSet, column: &str) -> TransformResult<usize> {
    dataset
        .schema
        .index_of(column)
        .ok_or_else(|| TransformError::InvalidColumn {
            column: column.to_string(),
        })
}

/// Which side of a pair a row's tag puts it on.
enum EventSide {
    Start,
    End,
}

fn classify(tag: Option<&Value>, options: &PairingOptions) -> Option<EventSide> {
    match tag {
        Some(Value::Utf8(s)) if *s == options.start_tag => Some(EventSide::Start),
        Some(Value::Utf8(s)) if *s == options.end_tag => Some(EventSide::End),
        _ => None,
    }
}

fn duration_data_type(dataset: &DataSet, time_idx: usize) -> DataType {
    match dataset.schema.fields[time_idx].data_type {
        DataType::Int64 => DataType::Int64,
        _ => DataType::Float64,
    }
}

/// `end - start` in the times' own unit; promotes to `Float64` when either side is a float.
fn subtract(end: &Value, start: &Value) -> Value {
    match (end, start) {
        (Value::Int64(e), Value::Int64(s)) => Value::Int64(e - s),
        (Value::Int64(e), Value::Float64(s)) => Value::Float64(*e as f64 - s),
        (Value::Float64(e), Value::Int64(s)) => Value::Float64(e - *s as f64),
        (Value::Float64(e), Value::Float64(s)) => Value::Float64(e - s),
        _ => Value::Null,
    }
}

fn numeric_time(
    dataset: &DataSet,
    row_idx: usize,
    time_idx: usize,
    time_column: &str,
) -> TransformResult<Value> {
    match dataset.rows[row_idx].get(time_idx) {
        Some(v @ (Value::Int64(_) | Value::Float64(_))) => Ok(v.clone()),
        other => Err(TransformError::TypeMismatch {
            row: row_idx,
            column: time_column.to_string(),
            expected: "Int64 or Float64".to_string(),
            found: other.cloned().unwrap_or(Value::Null).to_string(),
        }),
    }
}

fn run_aggregate(
    dataset: &DataSet,
    groups: &[RowGroup],
    key_idx: usize,
    type_idx: usize,
    time_idx: usize,
    options: &PairingOptions,
) -> TransformResult<DataSet> {
    let schema = Schema::new(vec![
        Field::new(
            options.key_field.clone(),
            dataset.schema.fields[key_idx].data_type.clone(),
        ),
        Field::new("duration", duration_data_type(dataset, time_idx)),
    ]);

    let mut rows = Vec::with_capacity(groups.len());
    for group in groups {
        let mut min_start: Option<Value> = None;
        let mut max_end: Option<Value> = None;

        for &row_idx in &group.row_indices {
            let row = &dataset.rows[row_idx];
            let Some(side) = classify(row.get(type_idx), options) else {
                continue;
            };
            // Null times are skipped, matching null-ignoring min/max aggregation.
            let time = match row.get(time_idx) {
                Some(Value::Null) | None => continue,
                Some(v @ (Value::Int64(_) | Value::Float64(_))) => v,
                Some(other) => {
                    return Err(TransformError::TypeMismatch {
                        row: row_idx,
                        column: options.time_field.clone(),
                        expected: "Int64 or Float64".to_string(),
                        found: other.to_string(),
                    });
                }
            };

            match side {
                EventSide::Start => {
                    if min_start
                        .as_ref()
                        .is_none_or(|cur| time.compare(cur).is_lt())
                    {
                        min_start = Some(time.clone());
                    }
                }
                EventSide::End => {
                    if max_end.as_ref().is_none_or(|cur| time.compare(cur).is_gt()) {
                        max_end = Some(time.clone());
                    }
                }
            }
        }

        let duration = match (&max_end, &min_start) {
            (Some(end), Some(start)) => subtract(end, start),
            _ => Value::Null,
        };
        rows.push(vec![group.key.clone(), duration]);
    }

    Ok(DataSet::new(schema, rows))
}

#[allow(clippy::too_many_arguments)]
fn run_pairing(
    dataset: &DataSet,
    groups: &[RowGroup],
    key_idx: usize,
    type_idx: usize,
    time_idx: usize,
    options: &PairingOptions,
    ctx: &TransformContext,
) -> TransformResult<PairingOutcome> {
    let mut fields = vec![Field::new(
        options.key_field.clone(),
        dataset.schema.fields[key_idx].data_type.clone(),
    )];
    for (i, f) in dataset.schema.fields.iter().enumerate() {
        if i != key_idx {
            fields.push(Field::new(format!("start_{}", f.name), f.data_type.clone()));
        }
    }
    for (i, f) in dataset.schema.fields.iter().enumerate() {
        if i != key_idx {
            fields.push(Field::new(format!("end_{}", f.name), f.data_type.clone()));
        }
    }
    fields.push(Field::new("duration", duration_data_type(dataset, time_idx)));
    let schema = Schema::new(fields);

    let mut rows = Vec::with_capacity(groups.len());
    let mut skipped = Vec::new();

    for group in groups {
        let mut starts: Vec<usize> = Vec::new();
        let mut ends: Vec<usize> = Vec::new();
        for &row_idx in &group.row_indices {
            match classify(dataset.rows[row_idx].get(type_idx), options) {
                Some(EventSide::Start) => starts.push(row_idx),
                Some(EventSide::End) => ends.push(row_idx),
                None => {}
            }
        }

        let degenerate = if starts.is_empty() {
            Some(PairingErrorKind::MissingStart)
        } else if ends.is_empty() {
            Some(PairingErrorKind::MissingEnd)
        } else if starts.len() > 1 || ends.len() > 1 {
            Some(PairingErrorKind::AmbiguousPairing)
        } else {
            None
        };

        if let Some(kind) = degenerate {
            match options.on_degenerate {
                DegenerateKeyPolicy::Abort => {
                    return Err(TransformError::Pairing {
                        key: group.key.to_string(),
                        kind,
                    });
                }
                DegenerateKeyPolicy::Skip => {
                    if let Some(obs) = &options.observer {
                        obs.on_skipped_key(ctx, &group.key, kind);
                    }
                    skipped.push(SkippedKey {
                        key: group.key.clone(),
                        kind,
                    });
                    continue;
                }
            }
        }

        let start_row = starts[0];
        let end_row = ends[0];
        let start_time = numeric_time(dataset, start_row, time_idx, &options.time_field)?;
        let end_time = numeric_time(dataset, end_row, time_idx, &options.time_field)?;

        let mut row = Vec::with_capacity(schema.fields.len());
        row.push(group.key.clone());
        for (i, cell) in dataset.rows[start_row].iter().enumerate() {
            if i != key_idx {
                row.push(cell.clone());
            }
        }
        for (i, cell) in dataset.rows[end_row].iter().enumerate() {
            if i != key_idx {
                row.push(cell.clone());
            }
        }
        row.push(subtract(&end_time, &start_time));
        rows.push(row);
    }

    Ok(PairingOutcome {
        dataset: DataSet::new(schema, rows),
        skipped,
    })
}
