//! `rust-window-transforms` is a small library of window-style transforms over an in-memory
//! [`types::DataSet`] (an ordered list of rows described by a [`types::Schema`]).
//!
//! Two independent, stateless transforms are provided:
//!
//! - [`transforms::reverse_assign`]: within each group of rows, reassigns the identifier
//!   column so each row receives the identifier at the mirrored position of the group's
//!   ascending identifier order (the smallest swaps with the largest, and so on inward).
//! - [`transforms::pair_durations`]: matches start-tagged and end-tagged event rows sharing a
//!   pairing key and computes each key's elapsed duration, either by null-propagating min/max
//!   aggregation or by strict one-start/one-end pairing that merges both rows' fields.
//!
//! Datasets are supplied by the caller (typically materialized from an external source such as
//! a database result set) and results are returned in memory; this crate does no I/O and keeps
//! no state across calls.
//!
//! ## Quick example: reverse identifiers per group
//!
//! ```rust
//! use rust_window_transforms::transforms::{reverse_assign, ReverseOptions};
//! use rust_window_transforms::types::{DataSet, DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), rust_window_transforms::TransformError> {
//! let schema = Schema::new(vec![
//!     Field::new("product_id", DataType::Int64),
//!     Field::new("category", DataType::Utf8),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("Electronics".to_string())],
//!         vec![Value::Int64(2), Value::Utf8("Electronics".to_string())],
//!         vec![Value::Int64(3), Value::Utf8("Electronics".to_string())],
//!         vec![Value::Int64(9), Value::Utf8("Electronics".to_string())],
//!     ],
//! );
//!
//! let out = reverse_assign(&ds, &ReverseOptions::new("product_id", "category"))?;
//! // {1, 2, 3, 9} -> {9, 3, 2, 1}
//! assert_eq!(out.rows[0][0], Value::Int64(9));
//! assert_eq!(out.rows[3][0], Value::Int64(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: durations between start/end events
//!
//! ```rust
//! use rust_window_transforms::transforms::{pair_durations, PairStrategy, PairingOptions};
//! use rust_window_transforms::types::{DataSet, DataType, Field, Schema, Value};
//!
//! # fn main() -> Result<(), rust_window_transforms::TransformError> {
//! let schema = Schema::new(vec![
//!     Field::new("session_id", DataType::Int64),
//!     Field::new("event_type", DataType::Utf8),
//!     Field::new("ts", DataType::Int64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("start".to_string()), Value::Int64(10)],
//!         vec![Value::Int64(1), Value::Utf8("end".to_string()), Value::Int64(20)],
//!         vec![Value::Int64(2), Value::Utf8("start".to_string()), Value::Int64(15)],
//!         vec![Value::Int64(2), Value::Utf8("end".to_string()), Value::Int64(35)],
//!     ],
//! );
//!
//! let opts = PairingOptions::new("session_id", "event_type", "ts", PairStrategy::Aggregate);
//! let out = pair_durations(&ds, &opts)?;
//! assert_eq!(out.dataset.rows[0], vec![Value::Int64(1), Value::Int64(10)]);
//! assert_eq!(out.dataset.rows[1], vec![Value::Int64(2), Value::Int64(20)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Strategy choice for event pairing
//!
//! [`transforms::PairStrategy::Aggregate`] yields exactly one numeric result per key and never
//! fails on degenerate keys (a key missing either side gets a `Null` duration). Switch to
//! [`transforms::PairStrategy::Pairing`] when fields that exist on only one of the two rows
//! must survive into the result; degenerate keys then fail per
//! [`transforms::DegenerateKeyPolicy`] instead of silently picking an event.
//!
//! ## Modules
//!
//! - [`types`]: schema + in-memory dataset types
//! - [`transforms`]: the two transforms and their options
//! - [`observability`]: observer hooks for transform outcomes
//! - [`error`]: error types used across the transforms

pub mod error;
mod grouping;
pub mod observability;
pub mod transforms;
pub mod types;

pub use error::{PairingErrorKind, TransformError, TransformResult};
