//! Row grouping shared by the transforms.
//!
//! Both transforms start by partitioning rows on one column's value. Groups keep
//! first-appearance order so transform output stays deterministic without relying on hash
//! iteration order.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::{DataSet, Value};

/// Hashable projection of a [`Value`] used as a grouping key.
///
/// Floats are keyed by bit pattern, so `-0.0` and `0.0` form distinct groups and `NaN` groups
/// with itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Str(String),
}

impl GroupKey {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => GroupKey::Null,
            Value::Int64(v) => GroupKey::Int(*v),
            Value::Float64(v) => GroupKey::Float(v.to_bits()),
            Value::Bool(v) => GroupKey::Bool(*v),
            Value::Utf8(s) => GroupKey::Str(s.clone()),
        }
    }
}

/// One group of rows sharing a value in the grouping column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RowGroup {
    /// The shared column value.
    pub key: Value,
    /// Indices into the dataset's rows, in input order.
    pub row_indices: Vec<usize>,
}

/// Partition row indices by the value of the column at `column_idx`.
///
/// Groups appear in first-appearance order; rows shorter than the schema contribute a
/// [`Value::Null`] key.
pub(crate) fn group_rows(dataset: &DataSet, column_idx: usize) -> Vec<RowGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<RowGroup> = Vec::new();

    for (i, row) in dataset.rows.iter().enumerate() {
        let cell = row.get(column_idx).cloned().unwrap_or(Value::Null);
        match index.entry(GroupKey::from_value(&cell)) {
            Entry::Occupied(slot) => groups[*slot.get()].row_indices.push(i),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(RowGroup {
                    key: cell,
                    row_indices: vec![i],
                });
            }
        }
    }

    groups
}
