//! Group-relative identifier reversal.
//!
//! Within each group, the identifier column's values are re-attached to rows in mirrored
//! ascending order: sort a group's identifiers ascending into `V[1..n]`, and the row whose
//! identifier has ascending rank `k` receives `V[n - k + 1]`. Equivalently, the new values are
//! the original values read in reverse sorted order. Every other column passes through
//! unchanged, and the output keeps the input row order.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{TransformError, TransformResult};
use crate::grouping::{RowGroup, group_rows};
use crate::observability::{TransformContext, TransformKind, TransformObserver, TransformStats};
use crate::types::{DataSet, Value};

/// Options for [`reverse_assign`].
#[derive(Clone)]
pub struct ReverseOptions {
    /// Name of the `Int64` column whose values are reversed within each group.
    pub identifier_field: String,
    /// Name of the column rows are partitioned by.
    pub group_field: String,
    /// Optional observer for outcome reporting.
    pub observer: Option<Arc<dyn TransformObserver>>,
}

impl ReverseOptions {
    /// Create options for the given identifier and grouping columns.
    pub fn new(identifier_field: impl Into<String>, group_field: impl Into<String>) -> Self {
        Self {
            identifier_field: identifier_field.into(),
            group_field: group_field.into(),
            observer: None,
        }
    }

    /// Attach an observer for outcome reporting.
    pub fn with_observer(mut self, observer: Arc<dyn TransformObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

impl fmt::Debug for ReverseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReverseOptions")
            .field("identifier_field", &self.identifier_field)
            .field("group_field", &self.group_field)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Reverse each group's identifier values across the group's ascending order.
///
/// The mapping is a bijection on each group's identifier set: applying the transform twice
/// restores every identifier. A group of size 1 maps its sole identifier to itself.
///
/// # Errors
///
/// - [`TransformError::InvalidColumn`] if either named column is missing.
/// - [`TransformError::TypeMismatch`] if an identifier cell is not `Int64` (including `Null`).
/// - [`TransformError::DuplicateIdentifierInGroup`] if a group's identifiers are not pairwise
///   distinct. There is no tie-break: a duplicate makes the mirrored assignment ambiguous, so
///   the call fails with no partial result.
pub fn reverse_assign(dataset: &DataSet, options: &ReverseOptions) -> TransformResult<DataSet> {
    let ctx = TransformContext {
        transform: TransformKind::ReverseAssign,
    };

    match reverse_assign_impl(dataset, options) {
        Ok((out, groups)) => {
            if let Some(obs) = &options.observer {
                obs.on_success(
                    &ctx,
                    TransformStats {
                        rows_in: dataset.row_count(),
                        rows_out: out.row_count(),
                        groups,
                    },
                );
            }
            Ok(out)
        }
        Err(err) => {
            if let Some(obs) = &options.observer {
                obs.on_failure(&ctx, &err);
            }
            Err(err)
        }
    }
}

fn reverse_assign_impl(
    dataset: &DataSet,
    options: &ReverseOptions,
) -> TransformResult<(DataSet, usize)> {
    let id_idx = dataset
        .schema
        .index_of(&options.identifier_field)
        .ok_or_else(|| TransformError::InvalidColumn {
            column: options.identifier_field.clone(),
        })?;
    let group_idx = dataset
        .schema
        .index_of(&options.group_field)
        .ok_or_else(|| TransformError::InvalidColumn {
            column: options.group_field.clone(),
        })?;

    let groups = group_rows(dataset, group_idx);

    // Groups are independent, so their mirrored assignments compute in parallel.
    let assignments: Vec<Vec<(usize, i64)>> = groups
        .par_iter()
        .map(|group| mirror_group(dataset, group, id_idx, &options.identifier_field))
        .collect::<TransformResult<_>>()?;

    let mut rows = dataset.rows.clone();
    for (row_idx, new_id) in assignments.into_iter().flatten() {
        rows[row_idx][id_idx] = Value::Int64(new_id);
    }

    Ok((DataSet::new(dataset.schema.clone(), rows), groups.len()))
}

/// Compute `(row index, new identifier)` pairs for one group.
fn mirror_group(
    dataset: &DataSet,
    group: &RowGroup,
    id_idx: usize,
    id_column: &str,
) -> TransformResult<Vec<(usize, i64)>> {
    let mut ids: Vec<(usize, i64)> = Vec::with_capacity(group.row_indices.len());
    for &row_idx in &group.row_indices {
        match dataset.rows[row_idx].get(id_idx) {
            Some(Value::Int64(v)) => ids.push((row_idx, *v)),
            other => {
                return Err(TransformError::TypeMismatch {
                    row: row_idx,
                    column: id_column.to_string(),
                    expected: "Int64".to_string(),
                    found: other.cloned().unwrap_or(Value::Null).to_string(),
                });
            }
        }
    }

    ids.sort_by_key(|&(_, v)| v);
    for pair in ids.windows(2) {
        if pair[0].1 == pair[1].1 {
            return Err(TransformError::DuplicateIdentifierInGroup {
                group: group.key.to_string(),
                value: pair[0].1,
            });
        }
    }

    // Ascending rank k takes the value at rank n - k + 1.
    let n = ids.len();
    Ok((0..n).map(|k| (ids[k].0, ids[n - 1 - k].1)).collect())
}
