//! Weighted channel distributions over n-dimensional vectors
//!
//! A [`Distribution`] buckets a set of vectors against an ordered list of numeric
//! channel boundaries. Channel `i` closes the range `[c[i-1], c[i]]`, with the
//! first channel opening at `0.0`.
//!
//! # Channel Assignment
//!
//! A vector `V` is assigned to channel `i` when any of the following holds:
//!
//! - the lower boundary `c[i-1]` lies within `[min(V), max(V)]`
//! - the upper boundary `c[i]` lies within `[min(V), max(V)]`
//! - some coordinate `d` of `V` satisfies `c[i-1] <= d <= c[i]`
//!
//! A vector matching `k` channels contributes `1/k` to each of them, so every
//! vector carries a total weight of one. Vectors matching no channel carry none.
//!
//! ```text
//! channels:   0 ──── 20 ──── 40 ──── 60 ──── 80 ──── 100
//! [0, 100]:   ├──────────────────────────────────────┤   0.2 per channel
//! [11, 22]:      ├──┤                                    0.5 to ch0, 0.5 to ch1
//! ```
//!
//! # Sharing
//!
//! A distribution is immutable once constructed. Accessors hand out shared
//! borrows of the backing storage, and concurrent reads need no synchronization.

use serde::{Deserialize, Serialize};

use crate::{ErrorKind, Vector};

/// Errors raised while building or comparing distributions.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DistributionError {
    #[display("invalid distribution configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[display("channels differ: expected {expected:?}, got {actual:?}")]
    ChannelsDiffer { expected: Vec<f64>, actual: Vec<f64> },
}

impl DistributionError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::ChannelsDiffer { .. } => ErrorKind::ChannelsDiffer,
        }
    }
}

/// Plain-data form of a [`Distribution`], as read from configuration files.
///
/// Converting into a [`Distribution`] runs the full construction-time validation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DistributionConfig {
    /// Label of the distribution
    pub name: String,
    /// Channel boundaries, in any order
    pub static_channels: Vec<f64>,
    /// Vectors to bucket; all must share one dimensionality
    pub vectors: Vec<Vector>,
}

/// A weighted histogram of vectors over ordered channel boundaries.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "DistributionConfig", into = "DistributionConfig")]
pub struct Distribution {
    name: String,
    /// Distinct boundaries, sorted ascending
    static_channels: Vec<f64>,
    /// Non-empty, uniform dimensionality
    vectors: Vec<Vector>,
}

impl Distribution {
    /// Creates a distribution after validating its configuration.
    ///
    /// The channels are sorted ascending; this only fixes the evaluation order,
    /// the channel set itself is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::InvalidConfiguration`] if the name is empty,
    /// there are no vectors, the vectors differ in dimensionality, there are no
    /// channels, or the channels contain `NaN` or duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// # use seqfeat_stats::distribution::Distribution;
    /// let distribution = Distribution::new("spans", [40.0, 20.0], vec![vec![0.0, 5.0]]).unwrap();
    /// assert_eq!(distribution.static_channels(), &[20.0, 40.0]);
    /// assert_eq!(distribution.dimensions(), 2);
    ///
    /// assert!(Distribution::new("", [20.0], vec![vec![0.0]]).is_err());
    /// assert!(Distribution::new("dup", [20.0, 20.0], vec![vec![0.0]]).is_err());
    /// ```
    pub fn new<N, C>(
        name: N,
        static_channels: C,
        vectors: Vec<Vector>,
    ) -> Result<Self, DistributionError>
    where
        N: Into<String>,
        C: IntoIterator<Item = f64>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(DistributionError::invalid("name must not be empty"));
        }

        let Some(first) = vectors.first() else {
            return Err(DistributionError::invalid("vectors must not be empty"));
        };
        let dimensions = first.len();
        if let Some((idx, vector)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimensions)
        {
            return Err(DistributionError::invalid(format!(
                "vector {idx} has {} dimensions, expected {dimensions}",
                vector.len()
            )));
        }

        let static_channels = validate_channels(static_channels)?;

        Ok(Self {
            name,
            static_channels,
            vectors,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel boundaries, sorted ascending.
    #[must_use]
    pub fn static_channels(&self) -> &[f64] {
        &self.static_channels
    }

    #[must_use]
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// Returns the dimensionality shared by every vector.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        // Construction guarantees at least one vector.
        self.vectors.first().map_or(0, Vec::len)
    }

    /// Computes the per-channel weights, in channel order.
    ///
    /// Each vector spreads a total weight of one evenly across the channels it
    /// matches (see the [module documentation](crate::distribution) for the matching rule).
    ///
    /// # Examples
    ///
    /// ```
    /// # use seqfeat_stats::distribution::Distribution;
    /// let channels = [20.0, 40.0, 60.0, 80.0, 100.0];
    /// let distribution = Distribution::new("full", channels, vec![vec![0.0, 100.0]]).unwrap();
    /// assert_eq!(distribution.calculate(), vec![0.2; 5]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calculate(&self) -> Vec<f64> {
        let mut weights = vec![0.0; self.static_channels.len()];
        let mut matched = Vec::with_capacity(self.static_channels.len());

        for vector in &self.vectors {
            matched.clear();
            let (min, max) = vector_bounds(vector);
            let spans = |boundary: f64| min <= boundary && boundary <= max;

            let mut lower = 0.0;
            for (idx, &upper) in self.static_channels.iter().enumerate() {
                let contains_coordinate = vector.iter().any(|&d| lower <= d && d <= upper);
                if spans(lower) || spans(upper) || contains_coordinate {
                    matched.push(idx);
                }
                lower = upper;
            }

            // A vector outside every channel carries no weight.
            if matched.is_empty() {
                continue;
            }
            let share = 1.0 / matched.len() as f64;
            for &idx in &matched {
                weights[idx] += share;
            }
        }

        weights
    }

    /// Returns the total weight over all channels.
    ///
    /// This equals the number of vectors matching at least one channel.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.calculate().iter().sum()
    }

    /// Computes `other.calculate()[i] - self.calculate()[i]` for every channel.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError::ChannelsDiffer`] unless both distributions
    /// use exactly the same channels.
    pub fn difference(&self, other: &Self) -> Result<Vec<f64>, DistributionError> {
        if self.static_channels != other.static_channels {
            return Err(DistributionError::ChannelsDiffer {
                expected: self.static_channels.clone(),
                actual: other.static_channels.clone(),
            });
        }

        let diff = other
            .calculate()
            .into_iter()
            .zip(self.calculate())
            .map(|(theirs, ours)| theirs - ours)
            .collect();
        Ok(diff)
    }
}

/// Validates channel boundaries and returns them sorted ascending.
///
/// # Errors
///
/// Returns [`DistributionError::InvalidConfiguration`] if there are no
/// channels, or they contain `NaN` or duplicates. `-0.0` and `0.0` are the
/// same boundary.
///
/// # Examples
///
/// ```
/// # use seqfeat_stats::distribution::validate_channels;
/// assert_eq!(validate_channels([40.0, 20.0]).unwrap(), [20.0, 40.0]);
/// assert!(validate_channels([0.0, -0.0]).is_err());
/// ```
pub fn validate_channels<C>(channels: C) -> Result<Vec<f64>, DistributionError>
where
    C: IntoIterator<Item = f64>,
{
    let mut channels = channels.into_iter().collect::<Vec<_>>();
    if channels.is_empty() {
        return Err(DistributionError::invalid("channels must not be empty"));
    }
    if channels.iter().any(|c| c.is_nan()) {
        return Err(DistributionError::invalid("channels must not contain NaN"));
    }
    channels.sort_by(f64::total_cmp);
    // Sorted and NaN-free: distinct neighbours must be strictly increasing.
    if let Some(pair) = channels.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(DistributionError::invalid(format!(
            "duplicate channel {}",
            pair[1]
        )));
    }
    Ok(channels)
}

impl TryFrom<DistributionConfig> for Distribution {
    type Error = DistributionError;

    fn try_from(config: DistributionConfig) -> Result<Self, Self::Error> {
        Self::new(config.name, config.static_channels, config.vectors)
    }
}

impl From<Distribution> for DistributionConfig {
    fn from(distribution: Distribution) -> Self {
        Self {
            name: distribution.name,
            static_channels: distribution.static_channels,
            vectors: distribution.vectors,
        }
    }
}

/// Returns `(min, max)` over the coordinates, or an empty range for a
/// zero-dimensional vector.
fn vector_bounds(vector: &[f64]) -> (f64, f64) {
    vector.iter().copied().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), d| (min.min(d), max.max(d)),
    )
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const FIVE_CHANNELS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
        }
    }

    fn random_distribution(rng: &mut Pcg64Mcg, name: &str, channels: &[f64]) -> Distribution {
        let dimensions = rng.random_range(1..4);
        let vectors = (0..rng.random_range(1..20))
            .map(|_| {
                (0..dimensions)
                    .map(|_| rng.random_range(-10.0..120.0))
                    .collect()
            })
            .collect();
        Distribution::new(name, channels.iter().copied(), vectors).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn test_channels_are_sorted() {
            let dist =
                Distribution::new("d", [100.0, 20.0, 60.0], vec![vec![1.0, 2.0]]).unwrap();
            assert_eq!(dist.static_channels(), &[20.0, 60.0, 100.0]);
            assert_eq!(dist.name(), "d");
        }

        #[test]
        fn test_empty_name() {
            let err = Distribution::new("", [20.0], vec![vec![1.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }

        #[test]
        fn test_empty_vectors() {
            let err = Distribution::new("d", [20.0], vec![]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }

        #[test]
        fn test_unequal_dimensions() {
            let err =
                Distribution::new("d", [20.0], vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
            assert!(err.to_string().contains("vector 1 has 1 dimensions"));
        }

        #[test]
        fn test_empty_channels() {
            let err = Distribution::new("d", Vec::new(), vec![vec![1.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }

        #[test]
        fn test_duplicate_channels() {
            let err = Distribution::new("d", [40.0, 20.0, 40.0], vec![vec![1.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
            assert!(err.to_string().contains("duplicate channel 40"));
        }

        #[test]
        fn test_signed_zero_duplicate_channels() {
            let err =
                Distribution::new("d", [0.0, -0.0, 20.0], vec![vec![0.0, 5.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
            assert!(err.to_string().contains("duplicate channel 0"));
        }

        #[test]
        fn test_validate_channels() {
            assert_eq!(
                validate_channels([100.0, -5.0, 0.0]).unwrap(),
                [-5.0, 0.0, 100.0]
            );
            assert!(validate_channels(Vec::new()).is_err());
            assert!(validate_channels([1.0, f64::NAN]).is_err());
            assert!(validate_channels([-0.0, 0.0]).is_err());
        }

        #[test]
        fn test_nan_channel() {
            let err = Distribution::new("d", [f64::NAN, 20.0], vec![vec![1.0]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        }

        #[test]
        fn test_dimensions() {
            let dist = Distribution::new("d", [20.0], vec![vec![1.0, 2.0, 3.0]]).unwrap();
            assert_eq!(dist.dimensions(), 3);
            assert_eq!(dist.vectors(), &[vec![1.0, 2.0, 3.0]]);
        }
    }

    mod calculate {
        use super::*;

        #[test]
        fn test_vectors_in_first_channel() {
            let dist = Distribution::new(
                "d",
                [50.0, 100.0],
                vec![vec![11.0, 22.0], vec![33.0, 44.0]],
            )
            .unwrap();
            assert_eq!(dist.calculate(), vec![2.0, 0.0]);
        }

        #[test]
        fn test_vector_spanning_all_channels() {
            let dist = Distribution::new("d", FIVE_CHANNELS, vec![vec![0.0, 100.0]]).unwrap();
            assert_eq!(dist.calculate(), vec![0.2, 0.2, 0.2, 0.2, 0.2]);
        }

        #[test]
        fn test_vector_straddling_boundary() {
            // [11, 22] lies in channel 0 by coordinate and spans boundary 20,
            // which closes channel 0 and opens channel 1.
            let dist = Distribution::new("d", FIVE_CHANNELS, vec![vec![11.0, 22.0]]).unwrap();
            assert_close(&dist.calculate(), &[0.5, 0.5, 0.0, 0.0, 0.0]);
        }

        #[test]
        fn test_vector_outside_all_channels() {
            let dist =
                Distribution::new("d", FIVE_CHANNELS, vec![vec![150.0, 200.0], vec![5.0, 6.0]])
                    .unwrap();
            assert_eq!(dist.calculate(), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
            assert!((dist.total_weight() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_zero_dimensional_vectors_carry_no_weight() {
            let dist = Distribution::new("d", FIVE_CHANNELS, vec![vec![], vec![]]).unwrap();
            assert_eq!(dist.calculate(), vec![0.0; 5]);
        }

        #[test]
        fn test_length_matches_channels() {
            let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);
            for _ in 0..50 {
                let dist = random_distribution(&mut rng, "d", &FIVE_CHANNELS);
                assert_eq!(dist.calculate().len(), dist.static_channels().len());
                assert!(dist.static_channels().is_sorted());
            }
        }

        #[test]
        fn test_total_weight_never_exceeds_vector_count() {
            let mut rng = Pcg64Mcg::seed_from_u64(42);
            for _ in 0..50 {
                let dist = random_distribution(&mut rng, "d", &FIVE_CHANNELS);
                #[expect(clippy::cast_precision_loss)]
                let count = dist.vectors().len() as f64;
                assert!(dist.total_weight() <= count + 1e-9);
            }
        }
    }

    mod difference {
        use super::*;

        #[test]
        fn test_reflexive() {
            let mut rng = Pcg64Mcg::seed_from_u64(7);
            for _ in 0..50 {
                let dist = random_distribution(&mut rng, "d", &FIVE_CHANNELS);
                assert_eq!(dist.difference(&dist).unwrap(), vec![0.0; 5]);
            }
        }

        #[test]
        fn test_antisymmetric() {
            let mut rng = Pcg64Mcg::seed_from_u64(11);
            for _ in 0..50 {
                let a = random_distribution(&mut rng, "a", &FIVE_CHANNELS);
                let b = random_distribution(&mut rng, "b", &FIVE_CHANNELS);
                let ab = a.difference(&b).unwrap();
                let ba = b.difference(&a).unwrap();
                let negated = ba.iter().map(|v| -v).collect::<Vec<_>>();
                assert_close(&ab, &negated);
            }
        }

        #[test]
        fn test_other_minus_self() {
            let narrow = Distribution::new("a", FIVE_CHANNELS, vec![vec![5.0, 10.0]]).unwrap();
            let wide = Distribution::new("b", FIVE_CHANNELS, vec![vec![0.0, 100.0]]).unwrap();
            assert_close(
                &narrow.difference(&wide).unwrap(),
                &[-0.8, 0.2, 0.2, 0.2, 0.2],
            );
        }

        #[test]
        fn test_channels_differ() {
            let a = Distribution::new("a", [50.0, 100.0], vec![vec![1.0]]).unwrap();
            let b = Distribution::new("b", [50.0, 99.0], vec![vec![1.0]]).unwrap();
            let err = a.difference(&b).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ChannelsDiffer);
        }

        #[test]
        fn test_channel_order_is_irrelevant() {
            let a = Distribution::new("a", [100.0, 50.0], vec![vec![1.0]]).unwrap();
            let b = Distribution::new("b", [50.0, 100.0], vec![vec![70.0]]).unwrap();
            assert_eq!(a.difference(&b).unwrap(), vec![-1.0, 1.0]);
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_deserialize_validates() {
            let json = r#"{"name":"d","static_channels":[100.0,50.0],"vectors":[[11.0,22.0]]}"#;
            let dist: Distribution = serde_json::from_str(json).unwrap();
            assert_eq!(dist.static_channels(), &[50.0, 100.0]);

            let json = r#"{"name":"","static_channels":[50.0],"vectors":[[1.0]]}"#;
            let err = serde_json::from_str::<Distribution>(json).unwrap_err();
            assert!(err.to_string().contains("name must not be empty"));
        }

        #[test]
        fn test_serialize_uses_sorted_channels() {
            let dist = Distribution::new("d", [100.0, 50.0], vec![vec![1.0]]).unwrap();
            let value = serde_json::to_value(&dist).unwrap();
            assert_eq!(value["static_channels"], serde_json::json!([50.0, 100.0]));
        }
    }
}
