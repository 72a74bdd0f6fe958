//! Cooperative cancellation for long-running scans

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Token for cancelling a running [`FeatureSet`](crate::feature_set::FeatureSet) scan.
///
/// Clones share one flag: call [`cancel`](Self::cancel) on any clone from any
/// thread, and the scan holding another clone stops at its next checkpoint.
///
/// # Example
///
/// ```
/// use seqfeat_analysis::{
///     cancel::CancellationToken,
///     feature_set::{FeatureSet, FeatureSetConfig},
/// };
/// use seqfeat_stats::ErrorKind;
///
/// let mut set = FeatureSet::new(FeatureSetConfig::new(["abcabc"])).unwrap();
/// let token = CancellationToken::new();
/// token.clone().cancel();
///
/// let err = set.scan_with_cancellation(&token).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Cancelled);
/// assert!(set.features().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the flag so the token can be reused.
    ///
    /// Only call this when no scan is running.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}
