//! Detected sub-sequences and the distribution of their positions
//!
//! A [`Feature`] pairs a sub-sequence with every position where it occurred.
//! Its [`Distribution`] is derived from those positions: it is named after the
//! sub-sequence and buckets the positions over the feature's channels.
//!
//! # Rebuild Policy
//!
//! The distribution is rebuilt eagerly on every [`Feature::add_position`], so
//! [`Feature::distribution`] always reflects the current positions. A failed
//! `add_position` leaves the feature unchanged.

use seqfeat_stats::{
    ErrorKind, Vector,
    distribution::{Distribution, DistributionError},
};

/// Channels used for a feature's distribution unless others are given.
pub const DEFAULT_CHANNELS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FeatureError {
    #[display("invalid feature configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[display("invalid position: expected {expected} dimensions, got {actual}")]
    InvalidPosition { expected: usize, actual: usize },
    #[display("failed to build feature distribution")]
    Distribution { source: DistributionError },
}

impl FeatureError {
    /// Returns the error kind, looking through a failed distribution build.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::InvalidPosition { .. } => ErrorKind::InvalidPosition,
            Self::Distribution { source } => source.kind(),
        }
    }
}

impl From<DistributionError> for FeatureError {
    fn from(source: DistributionError) -> Self {
        Self::Distribution { source }
    }
}

/// A detected sub-sequence together with all of its occurrence positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    sequence: String,
    /// Owns the positions as its vectors
    distribution: Distribution,
}

impl Feature {
    /// Creates a feature whose distribution uses [`DEFAULT_CHANNELS`].
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidConfiguration`] if `positions` or
    /// `sequence` is empty, or [`FeatureError::Distribution`] if the positions
    /// differ in dimensionality.
    pub fn new<S>(positions: Vec<Vector>, sequence: S) -> Result<Self, FeatureError>
    where
        S: Into<String>,
    {
        Self::with_channels(positions, sequence, DEFAULT_CHANNELS)
    }

    /// Creates a feature whose distribution uses the given channels.
    ///
    /// # Errors
    ///
    /// Same as [`Feature::new`], plus any channel violation reported by
    /// [`Distribution::new`].
    ///
    /// # Examples
    ///
    /// ```
    /// use seqfeat_analysis::feature::Feature;
    ///
    /// let feature =
    ///     Feature::with_channels(vec![vec![0.0, 2.0], vec![7.0, 9.0]], "ab", [5.0, 10.0]).unwrap();
    /// assert_eq!(feature.count(), 2);
    /// assert_eq!(feature.distribution().name(), "ab");
    /// assert_eq!(feature.distribution().calculate(), vec![1.0, 1.0]);
    /// ```
    pub fn with_channels<S, C>(
        positions: Vec<Vector>,
        sequence: S,
        channels: C,
    ) -> Result<Self, FeatureError>
    where
        S: Into<String>,
        C: IntoIterator<Item = f64>,
    {
        let sequence = sequence.into();
        if sequence.is_empty() {
            return Err(FeatureError::InvalidConfiguration {
                reason: "sequence must not be empty".to_owned(),
            });
        }
        if positions.is_empty() {
            return Err(FeatureError::InvalidConfiguration {
                reason: format!("feature '{sequence}' has no positions"),
            });
        }

        let distribution = Distribution::new(sequence.clone(), channels, positions)?;
        Ok(Self {
            sequence,
            distribution,
        })
    }

    /// Appends an occurrence position and rebuilds the distribution.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidPosition`] if `position` does not match
    /// the dimensionality of the existing positions.
    pub fn add_position(&mut self, position: Vector) -> Result<(), FeatureError> {
        let expected = self.distribution.dimensions();
        if position.len() != expected {
            return Err(FeatureError::InvalidPosition {
                expected,
                actual: position.len(),
            });
        }

        let mut positions = self.positions().to_vec();
        positions.push(position);
        self.distribution = Distribution::new(
            self.sequence.clone(),
            self.distribution.static_channels().iter().copied(),
            positions,
        )?;
        Ok(())
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[must_use]
    pub fn positions(&self) -> &[Vector] {
        self.distribution.vectors()
    }

    /// Returns the number of recorded occurrences.
    #[must_use]
    pub fn count(&self) -> usize {
        self.positions().len()
    }

    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }
}
