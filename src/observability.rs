//! Observer hooks for transform outcomes.
//!
//! The transforms are pure; when a caller wants visibility into what a call did (row counts,
//! group counts, skipped keys, failures) they attach a [`TransformObserver`] through the
//! options structs. With no observer attached, nothing is reported anywhere.

use std::fmt;
use std::sync::Arc;

use crate::error::{PairingErrorKind, TransformError};
use crate::types::Value;

/// Which transform produced an observer callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Group-relative identifier reversal.
    ReverseAssign,
    /// Start/end event pairing.
    PairDurations,
}

/// Context about a transform invocation.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// The transform being run.
    pub transform: TransformKind,
}

/// Minimal stats reported on a successful transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Number of input rows.
    pub rows_in: usize,
    /// Number of output rows.
    pub rows_out: usize,
    /// Number of groups (reversal) or distinct keys (pairing) observed.
    pub groups: usize,
}

/// Observer interface for transform outcomes.
///
/// Implementors can record metrics or logs.
pub trait TransformObserver: Send + Sync {
    /// Called when a transform succeeds.
    fn on_success(&self, _ctx: &TransformContext, _stats: TransformStats) {}

    /// Called when a transform fails.
    fn on_failure(&self, _ctx: &TransformContext, _error: &TransformError) {}

    /// Called for each key the pairing strategy drops under the skip policy.
    fn on_skipped_key(&self, _ctx: &TransformContext, _key: &Value, _kind: PairingErrorKind) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TransformObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn TransformObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl TransformObserver for CompositeObserver {
    fn on_success(&self, ctx: &TransformContext, stats: TransformStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &TransformContext, error: &TransformError) {
        for o in &self.observers {
            o.on_failure(ctx, error);
        }
    }

    fn on_skipped_key(&self, ctx: &TransformContext, key: &Value, kind: PairingErrorKind) {
        for o in &self.observers {
            o.on_skipped_key(ctx, key, kind);
        }
    }
}

/// Logs transform events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl TransformObserver for StdErrObserver {
    fn on_success(&self, ctx: &TransformContext, stats: TransformStats) {
        eprintln!(
            "[transform][ok] kind={:?} rows_in={} rows_out={} groups={}",
            ctx.transform, stats.rows_in, stats.rows_out, stats.groups
        );
    }

    fn on_failure(&self, ctx: &TransformContext, error: &TransformError) {
        eprintln!("[transform][err] kind={:?} err={}", ctx.transform, error);
    }

    fn on_skipped_key(&self, ctx: &TransformContext, key: &Value, kind: PairingErrorKind) {
        eprintln!(
            "[transform][skip] kind={:?} key={} reason={}",
            ctx.transform, key, kind
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{
        CompositeObserver, TransformContext, TransformKind, TransformObserver, TransformStats,
    };

    #[derive(Default)]
    struct CountingObserver {
        successes: AtomicUsize,
    }

    impl TransformObserver for CountingObserver {
        fn on_success(&self, _ctx: &TransformContext, _stats: TransformStats) {
            self.successes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn composite_fans_out_to_all_observers() {
        let a = Arc::new(CountingObserver::default());
        let b = Arc::new(CountingObserver::default());
        let composite = CompositeObserver::new(vec![a.clone(), b.clone()]);

        let ctx = TransformContext {
            transform: TransformKind::ReverseAssign,
        };
        composite.on_success(
            &ctx,
            TransformStats {
                rows_in: 1,
                rows_out: 1,
                groups: 1,
            },
        );

        assert_eq!(a.successes.load(Ordering::SeqCst), 1);
        assert_eq!(b.successes.load(Ordering::SeqCst), 1);
    }
}
