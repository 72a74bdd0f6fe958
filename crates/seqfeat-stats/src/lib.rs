//! Channel-based distribution statistics for the seqfeat project.
//!
//! This crate provides the numeric core shared by the feature analysis layer:
//!
//! - **Distributions**: weighted histograms of n-dimensional vectors over ordered
//!   numeric channel boundaries
//! - **Distribution comparison**: per-channel weight differences between two
//!   distributions sharing the same channels
//! - **Error classification**: the [`ErrorKind`] shared by every seqfeat error type
//!
//! # Modules
//!
//! - [`distribution`]: Distribution construction, evaluation and comparison
//!
//! # Examples
//!
//! ## Evaluating a distribution
//!
//! ```
//! use seqfeat_stats::distribution::Distribution;
//!
//! let distribution =
//!     Distribution::new("spans", [100.0, 50.0], vec![vec![11.0, 22.0], vec![33.0, 44.0]]).unwrap();
//! assert_eq!(distribution.static_channels(), &[50.0, 100.0]);
//! assert_eq!(distribution.calculate(), vec![2.0, 0.0]);
//! ```
//!
//! ## Comparing distributions
//!
//! ```
//! use seqfeat_stats::distribution::Distribution;
//!
//! let channels = [20.0, 40.0, 60.0, 80.0, 100.0];
//! let narrow = Distribution::new("narrow", channels, vec![vec![10.0, 15.0]]).unwrap();
//! let wide = Distribution::new("wide", channels, vec![vec![0.0, 100.0]]).unwrap();
//!
//! let diff = narrow.difference(&wide).unwrap();
//! assert_eq!(diff.len(), channels.len());
//! assert!(diff[0] < 0.0);
//! ```

pub mod distribution;

/// A point in n-dimensional space, such as an occurrence position `[start, end]`.
pub type Vector = Vec<f64>;

/// Coarse classification of every error raised by the seqfeat crates.
///
/// Error types wrapping another error report the kind of their cause, so callers
/// can match on the violated invariant without walking the source chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ErrorKind {
    /// A construction-time invariant was violated.
    #[display("invalid configuration")]
    InvalidConfiguration,
    /// An appended position does not match the existing dimensionality.
    #[display("invalid position")]
    InvalidPosition,
    /// Two distributions were compared across different channel sets.
    #[display("channels differ")]
    ChannelsDiffer,
    /// An operation requiring at least one element received none.
    #[display("empty input")]
    EmptyInput,
    /// A long-running operation was cancelled before completion.
    #[display("cancelled")]
    Cancelled,
}
