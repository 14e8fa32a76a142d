use std::fmt;

use thiserror::Error;

/// Convenience result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Why the pairing strategy cannot produce a merged record for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingErrorKind {
    /// The key has no start-tagged row.
    MissingStart,
    /// The key has no end-tagged row.
    MissingEnd,
    /// The key has more than one start-tagged or end-tagged row.
    AmbiguousPairing,
}

impl fmt::Display for PairingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingErrorKind::MissingStart => f.write_str("no start event"),
            PairingErrorKind::MissingEnd => f.write_str("no end event"),
            PairingErrorKind::AmbiguousPairing => {
                f.write_str("more than one start or end event")
            }
        }
    }
}

/// Error type returned by the transforms.
///
/// This is a single error enum shared across both transforms. All errors surface synchronously;
/// there is no partial result on failure.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A named column does not exist on the input schema.
    #[error("invalid column: '{column}' is not in the schema")]
    InvalidColumn { column: String },

    /// Identifier values are not pairwise distinct within one group.
    ///
    /// Reversal is a bijection on each group's identifier set; duplicates would make the
    /// mirrored assignment ambiguous, so the transform fails fast instead.
    #[error("duplicate identifier {value} in group '{group}'")]
    DuplicateIdentifierInGroup { group: String, value: i64 },

    /// A cell does not have the type the transform requires.
    #[error("type mismatch at row {row} column '{column}': expected {expected}, got {found}")]
    TypeMismatch {
        row: usize,
        column: String,
        expected: String,
        found: String,
    },

    /// The pairing strategy cannot pair the events of one key.
    #[error("cannot pair events for key '{key}': {kind}")]
    Pairing { key: String, kind: PairingErrorKind },
}
