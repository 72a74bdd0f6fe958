//! Recurring sub-sequence detection over one or more input sequences
//!
//! A [`FeatureSet`] scans its input sequences for every contiguous run of
//! tokens within the configured length bounds, records where each distinct run
//! occurs, and keeps the runs that occur at least `min_count` times as
//! [`Feature`]s.
//!
//! # Scan Algorithm
//!
//! 1. Tokenize every sequence (see [`tokenize`](crate::tokenize::tokenize))
//! 2. Slide windows of every length in `[min_length, max_length]` across each
//!    sequence; the joined window text is the candidate
//! 3. Record each window as an occurrence `[start, start + length]` in that
//!    sequence's token index space (overlapping occurrences included)
//! 4. Drop candidates occurring fewer than `min_count` times in total
//! 5. Build one [`Feature`] per remaining candidate
//!
//! Features are ordered lexicographically by sequence, so repeated scans of the
//! same input produce identical results.
//!
//! # Atomicity
//!
//! A scan either replaces the whole feature collection or fails and leaves the
//! previous collection untouched.
//!
//! # Example
//!
//! ```
//! use seqfeat_analysis::feature_set::{FeatureSet, FeatureSetConfig};
//!
//! let config = FeatureSetConfig {
//!     min_length: 2,
//!     max_length: Some(2),
//!     min_count: 2,
//!     ..FeatureSetConfig::new(["aaa"])
//! };
//! let mut set = FeatureSet::new(config).unwrap();
//! set.scan().unwrap();
//!
//! let aa = set.feature("aa").unwrap();
//! assert_eq!(aa.positions(), &[vec![0.0, 2.0], vec![1.0, 3.0]]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use seqfeat_stats::{
    ErrorKind, Vector,
    distribution::{DistributionError, validate_channels},
};
use tracing::{debug, info, warn};

use crate::{
    cancel::CancellationToken,
    feature::{DEFAULT_CHANNELS, Feature, FeatureError},
    tokenize::tokenize,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FeatureSetError {
    #[display("invalid feature set configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[display("invalid feature set channels")]
    Channels { source: DistributionError },
    #[display("no tokens found in any input sequence")]
    EmptyInput,
    #[display("failed to build feature '{sequence}'")]
    Feature {
        sequence: String,
        source: FeatureError,
    },
    #[display("scan cancelled")]
    Cancelled,
}

impl FeatureSetError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::Channels { source } => source.kind(),
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::Feature { source, .. } => source.kind(),
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Scan configuration for a [`FeatureSet`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureSetConfig {
    /// Shortest candidate, in tokens (at least 1)
    pub min_length: usize,
    /// Longest candidate, in tokens; `None` is unbounded
    pub max_length: Option<usize>,
    /// Minimum total occurrences for a candidate to become a feature
    pub min_count: usize,
    /// Token separator; empty scans individual characters
    pub separator: String,
    /// Input sequences to scan
    pub sequences: Vec<String>,
    /// Channels of every scanned feature's distribution
    pub channels: Vec<f64>,
}

impl Default for FeatureSetConfig {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: None,
            min_count: 1,
            separator: String::new(),
            sequences: vec![],
            channels: DEFAULT_CHANNELS.to_vec(),
        }
    }
}

impl FeatureSetConfig {
    /// Creates a default configuration over the given sequences.
    #[must_use]
    pub fn new<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sequences: sequences.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), FeatureSetError> {
        if self.min_length < 1 {
            return Err(FeatureSetError::invalid("min_length must be at least 1"));
        }
        if let Some(max_length) = self.max_length
            && max_length < self.min_length
        {
            return Err(FeatureSetError::invalid(format!(
                "max_length {max_length} is less than min_length {}",
                self.min_length
            )));
        }
        if self.sequences.is_empty() {
            return Err(FeatureSetError::invalid("sequences must not be empty"));
        }
        validate_channels(self.channels.iter().copied())
            .map_err(|source| FeatureSetError::Channels { source })?;
        Ok(())
    }
}

/// Scanner and container for the features found in a set of sequences.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    config: FeatureSetConfig,
    /// Sorted by sequence
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Creates an unscanned feature set.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureSetError::InvalidConfiguration`] if `min_length` is
    /// zero, `max_length` is below `min_length`, or there are no sequences.
    /// Returns [`FeatureSetError::Channels`] if the channels fail
    /// [`validate_channels`].
    pub fn new(config: FeatureSetConfig) -> Result<Self, FeatureSetError> {
        config.validate()?;
        Ok(Self {
            config,
            features: vec![],
        })
    }

    #[must_use]
    pub fn config(&self) -> &FeatureSetConfig {
        &self.config
    }

    /// Scans the input sequences and replaces the feature collection.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureSetError::EmptyInput`] if no sequence contains a token,
    /// or [`FeatureSetError::Feature`] if a feature fails to build. The
    /// previous features are kept on failure.
    pub fn scan(&mut self) -> Result<(), FeatureSetError> {
        self.scan_with_cancellation(&CancellationToken::new())
    }

    /// Like [`scan`](Self::scan), checking `token` between scan steps.
    ///
    /// # Errors
    ///
    /// Additionally returns [`FeatureSetError::Cancelled`] once `token` is
    /// cancelled.
    pub fn scan_with_cancellation(
        &mut self,
        token: &CancellationToken,
    ) -> Result<(), FeatureSetError> {
        let occurrences = self.collect_occurrences(token).inspect_err(|err| {
            if matches!(err, FeatureSetError::Cancelled) {
                warn!("feature scan cancelled while collecting candidates");
            }
        })?;
        let num_candidates = occurrences.len();

        let mut features = vec![];
        for (sequence, positions) in occurrences {
            if token.is_cancelled() {
                warn!("feature scan cancelled while building features");
                return Err(FeatureSetError::Cancelled);
            }
            if positions.len() < self.config.min_count {
                continue;
            }
            match Feature::with_channels(
                positions,
                sequence.as_str(),
                self.config.channels.iter().copied(),
            ) {
                Ok(feature) => features.push(feature),
                Err(source) => return Err(FeatureSetError::Feature { sequence, source }),
            }
        }

        info!(
            sequences = self.config.sequences.len(),
            candidates = num_candidates,
            features = features.len(),
            rejected = num_candidates - features.len(),
            "feature scan complete"
        );
        self.features = features;
        Ok(())
    }

    /// Maps every candidate to all of its occurrence positions.
    ///
    /// The map's key order makes the feature order deterministic.
    #[expect(clippy::cast_precision_loss)]
    fn collect_occurrences(
        &self,
        token: &CancellationToken,
    ) -> Result<BTreeMap<String, Vec<Vector>>, FeatureSetError> {
        let separator = self.config.separator.as_str();
        let mut occurrences = BTreeMap::<String, Vec<Vector>>::new();
        let mut total_tokens = 0;

        for (seq_idx, sequence) in self.config.sequences.iter().enumerate() {
            if token.is_cancelled() {
                return Err(FeatureSetError::Cancelled);
            }
            let tokens = tokenize(sequence, separator);
            total_tokens += tokens.len();

            let max_length = self
                .config
                .max_length
                .map_or(tokens.len(), |max| max.min(tokens.len()));
            let mut num_windows = 0;
            for length in self.config.min_length..=max_length {
                if token.is_cancelled() {
                    return Err(FeatureSetError::Cancelled);
                }
                for (start, window) in tokens.windows(length).enumerate() {
                    occurrences
                        .entry(window.join(separator))
                        .or_default()
                        .push(vec![start as f64, (start + length) as f64]);
                    num_windows += 1;
                }
            }
            debug!(
                sequence = seq_idx,
                tokens = tokens.len(),
                windows = num_windows,
                "collected candidate windows"
            );
        }

        if total_tokens == 0 {
            return Err(FeatureSetError::EmptyInput);
        }
        Ok(occurrences)
    }

    /// Returns all features, sorted by sequence.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Looks up the feature with exactly this sequence.
    #[must_use]
    pub fn feature(&self, sequence: &str) -> Option<&Feature> {
        self.features
            .binary_search_by(|feature| feature.sequence().cmp(sequence))
            .ok()
            .map(|idx| &self.features[idx])
    }

    /// Returns the features occurring at least `min` times.
    pub fn features_by_count(&self, min: usize) -> impl Iterator<Item = &Feature> + '_ {
        self.features.iter().filter(move |f| f.count() >= min)
    }

    /// Returns the features whose sequence has between `min` and `max`
    /// characters, inclusive; `max = None` is unbounded.
    pub fn features_by_length(
        &self,
        min: usize,
        max: Option<usize>,
    ) -> impl Iterator<Item = &Feature> + '_ {
        self.features.iter().filter(move |f| {
            let len = f.sequence().chars().count();
            len >= min && max.is_none_or(|max| len <= max)
        })
    }

    /// Returns the features whose sequence contains `substr`; an empty
    /// `substr` matches every feature.
    pub fn features_by_sequence<'a>(
        &'a self,
        substr: &'a str,
    ) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |f| f.sequence().contains(substr))
    }
}
