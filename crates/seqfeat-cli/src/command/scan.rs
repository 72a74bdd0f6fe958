//! Feature scan command
//!
//! Builds a feature set from command-line sequences, sequence files and an
//! optional TOML configuration, scans it and reports the features passing the
//! query filters.

use std::{collections::BTreeSet, fmt, path::PathBuf, str::FromStr};

use anyhow::Context;
use clap::Args;
use seqfeat_analysis::{
    feature::Feature,
    feature_set::{FeatureSet, FeatureSetConfig},
    store::{MemoryStore, persist_features},
};

use crate::{
    schema::report::{FeatureRecord, ScanReport},
    util::{self, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct ScanArg {
    /// Sequences to scan
    sequences: Vec<String>,

    /// Read additional sequences from a file, one per line
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// TOML file with scan settings; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Shortest candidate sub-sequence, in tokens
    #[arg(long)]
    min_length: Option<usize>,

    /// Longest candidate sub-sequence, in tokens (unbounded if omitted)
    #[arg(long)]
    max_length: Option<usize>,

    /// Minimum total occurrences for a candidate to be reported
    #[arg(long)]
    min_count: Option<usize>,

    /// Token separator; scans individual characters if empty
    #[arg(long)]
    separator: Option<String>,

    /// Distribution channel boundaries (comma-separated)
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<f64>>,

    /// Only report features whose sequence contains this text
    #[arg(long, default_value = "")]
    contains: String,

    /// Only report features occurring at least this many times
    #[arg(long, default_value_t = 0)]
    count_at_least: usize,

    /// Only report features whose sequence length is in `MIN..MAX` or `MIN..`
    #[arg(long)]
    length_range: Option<LengthRange>,

    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the positions of every reported feature to this key/value JSON file
    #[arg(long)]
    store: Option<PathBuf>,
}

/// Inclusive character-length filter parsed from `MIN..MAX` or `MIN..`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LengthRange {
    min: usize,
    max: Option<usize>,
}

impl FromStr for LengthRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once("..")
            .ok_or_else(|| format!("expected MIN..MAX or MIN.., got '{s}'"))?;
        let min = min
            .parse()
            .map_err(|e| format!("invalid minimum length '{min}': {e}"))?;
        let max = if max.is_empty() {
            None
        } else {
            Some(
                max.parse()
                    .map_err(|e| format!("invalid maximum length '{max}': {e}"))?,
            )
        };
        if let Some(max) = max
            && max < min
        {
            return Err(format!("maximum length {max} is less than minimum {min}"));
        }
        Ok(Self { min, max })
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{max}", self.min),
            None => write!(f, "{}..", self.min),
        }
    }
}

impl ScanArg {
    /// Merges the configuration file, sequence files and command-line flags.
    fn build_config(&self) -> anyhow::Result<FeatureSetConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_toml_file::<FeatureSetConfig, _>("scan config", path)?,
            None => FeatureSetConfig::default(),
        };

        for path in &self.files {
            config.sequences.extend(util::read_sequences_file(path)?);
        }
        config.sequences.extend(self.sequences.iter().cloned());

        if let Some(min_length) = self.min_length {
            config.min_length = min_length;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = Some(max_length);
        }
        if let Some(min_count) = self.min_count {
            config.min_count = min_count;
        }
        if let Some(separator) = &self.separator {
            config.separator.clone_from(separator);
        }
        if let Some(channels) = &self.channels {
            config.channels.clone_from(channels);
        }
        Ok(config)
    }

    /// Applies the query filters, keeping the features matching all of them.
    fn select<'a>(&self, set: &'a FeatureSet) -> Vec<&'a Feature> {
        let (min_len, max_len) = self
            .length_range
            .map_or((0, None), |range| (range.min, range.max));
        let by_length = set
            .features_by_length(min_len, max_len)
            .map(Feature::sequence)
            .collect::<BTreeSet<_>>();
        let by_sequence = set
            .features_by_sequence(&self.contains)
            .map(Feature::sequence)
            .collect::<BTreeSet<_>>();

        set.features_by_count(self.count_at_least)
            .filter(|f| by_length.contains(f.sequence()) && by_sequence.contains(f.sequence()))
            .collect()
    }
}

pub(crate) fn run(arg: &ScanArg) -> anyhow::Result<()> {
    let config = arg.build_config()?;
    let mut set = FeatureSet::new(config).context("Invalid scan configuration")?;
    set.scan().context("Feature scan failed")?;

    let selected = arg.select(&set);
    tracing::info!(
        total = set.features().len(),
        selected = selected.len(),
        "selected features"
    );

    if let Some(path) = &arg.store {
        save_store(&selected, path)?;
    }

    let report = ScanReport {
        scanned_at: chrono::Utc::now(),
        config: set.config().clone(),
        total_features: set.features().len(),
        features: selected
            .iter()
            .map(|feature| FeatureRecord::from_feature(feature))
            .collect(),
    };
    Output::save_json(&report, arg.output.as_deref())
}

/// Persists the features through an in-memory store and dumps it as JSON.
fn save_store(features: &[&Feature], path: &std::path::Path) -> anyhow::Result<()> {
    let mut store = MemoryStore::new();
    let written = persist_features(features.iter().copied(), &mut store)
        .context("Failed to persist features")?;

    let entries = store
        .entries()
        .map(|(key, value)| {
            let value = serde_json::from_slice::<serde_json::Value>(value)
                .with_context(|| format!("Stored value for '{key}' is not valid JSON"))?;
            Ok((key.to_owned(), value))
        })
        .collect::<anyhow::Result<serde_json::Map<_, _>>>()?;

    Output::save_json(&entries, Some(path))?;
    tracing::info!(written, path = %path.display(), "feature store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        scan: ScanArg,
    }

    fn parse(args: &[&str]) -> ScanArg {
        TestCli::try_parse_from(std::iter::once("scan").chain(args.iter().copied()))
            .unwrap()
            .scan
    }

    fn scanned(arg: &ScanArg) -> FeatureSet {
        let mut set = FeatureSet::new(arg.build_config().unwrap()).unwrap();
        set.scan().unwrap();
        set
    }

    mod length_range {
        use super::*;

        #[test]
        fn test_parse_bounded() {
            let range = "2..5".parse::<LengthRange>().unwrap();
            assert_eq!(
                range,
                LengthRange {
                    min: 2,
                    max: Some(5)
                }
            );
            assert_eq!(range.to_string(), "2..5");
        }

        #[test]
        fn test_parse_unbounded() {
            let range = "3..".parse::<LengthRange>().unwrap();
            assert_eq!(range, LengthRange { min: 3, max: None });
            assert_eq!(range.to_string(), "3..");
        }

        #[test]
        fn test_parse_errors() {
            assert!("3".parse::<LengthRange>().is_err());
            assert!("a..3".parse::<LengthRange>().is_err());
            assert!("5..2".parse::<LengthRange>().is_err());
        }
    }

    mod config {
        use super::*;

        #[test]
        fn test_flags_override_defaults() {
            let arg = parse(&[
                "the cat sat",
                "--min-length",
                "2",
                "--max-length",
                "3",
                "--min-count",
                "0",
                "--separator",
                " ",
                "--channels",
                "1,2,3",
            ]);
            let config = arg.build_config().unwrap();
            assert_eq!(config.sequences, ["the cat sat"]);
            assert_eq!(config.min_length, 2);
            assert_eq!(config.max_length, Some(3));
            assert_eq!(config.min_count, 0);
            assert_eq!(config.separator, " ");
            assert_eq!(config.channels, [1.0, 2.0, 3.0]);
        }

        #[test]
        fn test_defaults_without_flags() {
            let config = parse(&["abc"]).build_config().unwrap();
            assert_eq!(
                config,
                FeatureSetConfig::new(["abc"]),
                "no flags should leave the defaults in place"
            );
        }

        #[test]
        fn test_config_file_is_reported() {
            let arg = parse(&["abc", "--config", "/nonexistent/seqfeat.toml"]);
            let err = arg.build_config().unwrap_err();
            assert!(err.to_string().contains("scan config"));
        }
    }

    mod select {
        use super::*;

        #[test]
        fn test_all_filters_combine() {
            let arg = parse(&[
                "abcab",
                "--max-length",
                "3",
                "--count-at-least",
                "1",
                "--contains",
                "b",
                "--length-range",
                "2..2",
            ]);
            let set = scanned(&arg);
            let selected = arg
                .select(&set)
                .into_iter()
                .map(Feature::sequence)
                .collect::<Vec<_>>();
            assert_eq!(selected, ["ab", "bc"]);
        }

        #[test]
        fn test_no_filters_select_everything() {
            let arg = parse(&["abab"]);
            let set = scanned(&arg);
            assert_eq!(arg.select(&set).len(), set.features().len());
        }
    }
}
