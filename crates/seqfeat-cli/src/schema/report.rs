use chrono::{DateTime, Utc};
use seqfeat_analysis::{feature::Feature, feature_set::FeatureSetConfig};
use seqfeat_stats::{Vector, distribution::Distribution};
use serde::{Deserialize, Serialize};

/// Result of the `scan` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Timestamp when the scan finished (ISO 8601 format)
    pub scanned_at: DateTime<Utc>,
    /// Effective configuration after merging file and command-line settings
    pub config: FeatureSetConfig,
    /// Number of features found before query filters were applied
    pub total_features: usize,
    /// Features passing the query filters, sorted by sequence
    pub features: Vec<FeatureRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub sequence: String,
    pub count: usize,
    pub positions: Vec<Vector>,
    pub weights: ChannelWeights,
}

impl FeatureRecord {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            sequence: feature.sequence().to_owned(),
            count: feature.count(),
            positions: feature.positions().to_vec(),
            weights: ChannelWeights::from_distribution(feature.distribution()),
        }
    }
}

/// Per-channel weights of one distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelWeights {
    pub name: String,
    pub channels: Vec<f64>,
    pub weights: Vec<f64>,
    pub total_weight: f64,
}

impl ChannelWeights {
    pub fn from_distribution(distribution: &Distribution) -> Self {
        let weights = distribution.calculate();
        Self {
            name: distribution.name().to_owned(),
            channels: distribution.static_channels().to_vec(),
            total_weight: distribution.total_weight(),
            weights,
        }
    }
}

/// Result of the `compare` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferenceReport {
    pub base: ChannelWeights,
    pub other: ChannelWeights,
    /// `other.weights[i] - base.weights[i]` for every channel
    pub difference: Vec<f64>,
}
