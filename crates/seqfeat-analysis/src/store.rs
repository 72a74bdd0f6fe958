//! Hand-off of scanned features to a key/value store
//!
//! The analysis core never persists anything on its own. Callers that want to
//! keep scan results pass the features to [`persist_features`], which encodes
//! each feature's positions as a JSON vector list and writes it under
//! [`feature_key`] through a [`FeatureStore`].
//!
//! # Example
//!
//! ```
//! use seqfeat_analysis::{
//!     feature_set::{FeatureSet, FeatureSetConfig},
//!     store::{MemoryStore, feature_key, persist_features},
//! };
//!
//! let mut set = FeatureSet::new(FeatureSetConfig::new(["abab"])).unwrap();
//! set.scan().unwrap();
//!
//! let mut store = MemoryStore::new();
//! let written = persist_features(set.features_by_count(2), &mut store).unwrap();
//! assert_eq!(written, 3);
//! assert_eq!(store.get(&feature_key("ab")), Some(&b"[[0.0,2.0],[2.0,4.0]]"[..]));
//! ```

use std::{collections::BTreeMap, convert::Infallible};

use crate::feature::Feature;

/// A generic key/value store accepting encoded features.
pub trait FeatureStore {
    type Error;

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), Self::Error>;
}

/// In-memory [`FeatureStore`] backed by an ordered map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> + '_ {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }
}

impl FeatureStore for MemoryStore {
    type Error = Infallible;

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), Self::Error> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Returns the store key for the feature with the given sequence.
#[must_use]
pub fn feature_key(sequence: &str) -> String {
    format!("feature:{sequence}")
}

/// Error raised while handing features to a [`FeatureStore`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistError<E> {
    #[display("failed to encode positions of feature '{sequence}'")]
    Encode {
        sequence: String,
        source: serde_json::Error,
    },
    #[display("failed to store '{key}'")]
    Store { key: String, source: E },
}

/// Writes the positions of every feature to `store`, returning the number of
/// entries written.
///
/// Stops at the first failure; entries written before it stay in the store.
pub fn persist_features<'a, I, S>(
    features: I,
    store: &mut S,
) -> Result<usize, PersistError<S::Error>>
where
    I: IntoIterator<Item = &'a Feature>,
    S: FeatureStore,
{
    let mut written = 0;
    for feature in features {
        let value =
            serde_json::to_vec(feature.positions()).map_err(|source| PersistError::Encode {
                sequence: feature.sequence().to_owned(),
                source,
            })?;
        let key = feature_key(feature.sequence());
        if let Err(source) = store.set(&key, value) {
            return Err(PersistError::Store { key, source });
        }
        written += 1;
    }
    tracing::debug!(written, "persisted features");
    Ok(written)
}
