//! Recurring sub-sequence analysis for text sequences
//!
//! This crate detects recurring sub-sequences ("features") in one or more input
//! sequences and models where each one occurs as a channel
//! [`Distribution`](seqfeat_stats::distribution::Distribution).
//!
//! # Overview
//!
//! 1. **Configure** ([`feature_set::FeatureSetConfig`]): length bounds, minimum
//!    occurrence count, token separator and input sequences
//! 2. **Scan** ([`feature_set::FeatureSet::scan`]): collect every candidate
//!    sub-sequence and all of its occurrence positions
//! 3. **Inspect** ([`feature::Feature`]): each surviving candidate with its
//!    positions and derived distribution
//! 4. **Query** ([`feature_set::FeatureSet::features_by_count`] and friends):
//!    filter the scanned features
//! 5. **Persist** ([`store::persist_features`]): optionally hand positions to a
//!    key/value store
//!
//! Long scans can be interrupted through a [`cancel::CancellationToken`].
//!
//! # Example
//!
//! ```
//! use seqfeat_analysis::feature_set::{FeatureSet, FeatureSetConfig};
//!
//! let config = FeatureSetConfig::new(["This is a test.", "This is another test."]);
//! let mut set = FeatureSet::new(config)?;
//! set.scan()?;
//!
//! for sequence in ["This", "is", "test", "."] {
//!     assert!(set.feature(sequence).is_some());
//! }
//!
//! let this = set.feature("This").unwrap();
//! assert_eq!(this.count(), 2);
//! assert_eq!(this.positions(), &[vec![0.0, 4.0], vec![0.0, 4.0]]);
//! assert_eq!(this.distribution().calculate(), vec![2.0, 0.0, 0.0, 0.0, 0.0]);
//!
//! let frequent = set.features_by_count(3).count();
//! assert!(frequent > 0);
//! # Ok::<(), seqfeat_analysis::feature_set::FeatureSetError>(())
//! ```

pub mod cancel;
pub mod feature;
pub mod feature_set;
pub mod store;
pub mod tokenize;
