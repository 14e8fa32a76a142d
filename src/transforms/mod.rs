//! In-memory windowed transforms over [`crate::types::DataSet`].
//!
//! Both transforms are pure: they read an input dataset and return a new one, never mutating
//! the input. Each is configured through an options struct and reports to an optional
//! [`crate::observability::TransformObserver`].
//!
//! - [`reverse_assign()`]: group-relative identifier reversal
//! - [`pair_durations()`]: start/end event pairing
//!
//! ## Example: reverse, then present in descending order
//!
//! ```rust
//! use rust_window_transforms::transforms::{reverse_assign, ReverseOptions};
//! use rust_window_transforms::types::{DataSet, DataType, Field, Schema, SortOrder, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("product_id", DataType::Int64),
//!     Field::new("category", DataType::Utf8),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("Electronics".to_string())],
//!         vec![Value::Int64(2), Value::Utf8("Electronics".to_string())],
//!         vec![Value::Int64(9), Value::Utf8("Electronics".to_string())],
//!     ],
//! );
//!
//! let out = reverse_assign(&ds, &ReverseOptions::new("product_id", "category")).unwrap();
//! let presented = out.sorted_by("product_id", SortOrder::Descending).unwrap();
//! assert_eq!(presented.rows[0][0], Value::Int64(9));
//! ```

pub mod pairing;
pub mod reverse;

pub use pairing::{
    DegenerateKeyPolicy, PairStrategy, PairingOptions, PairingOutcome, SkippedKey, pair_durations,
};
pub use reverse::{ReverseOptions, reverse_assign};
