//! Per-player feature vectors stored as JSON files.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use sse_predict::FeatureSet;
use thiserror::Error;

/// Feature key holding the observed value; it is never sent to the model.
pub const OBSERVED_FEATURE: &str = "NBA PPG";

const FEATURE_EXTENSION: &str = "json";

/// Errors raised while loading a player's features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The player name cannot be mapped to a file name.
    #[error("'{player}' cannot be used as a feature file name")]
    InvalidName {
        /// Offending name.
        player: String,
    },
    /// The feature file could not be read.
    #[error("failed to read feature file '{path}': {source}")]
    Read {
        /// Feature file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The feature file is not valid JSON.
    #[error("feature file '{path}' is not valid JSON: {source}")]
    Parse {
        /// Feature file.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The feature file is valid JSON but not an object.
    #[error("feature file '{path}' does not contain a JSON object")]
    NotAnObject {
        /// Feature file.
        path: Utf8PathBuf,
    },
    /// The observed value is absent.
    #[error("feature file '{path}' has no '{OBSERVED_FEATURE}' entry")]
    MissingObserved {
        /// Feature file.
        path: Utf8PathBuf,
    },
}

/// Model inputs for one player plus the value actually observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFeatures {
    /// Features sent to the model.
    pub features: FeatureSet,
    /// Observed value, shown next to the prediction.
    pub observed: Value,
}

/// Reads `<dir>/<First>_<Last>.json` feature files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureStore {
    dir: Utf8PathBuf,
}

impl FeatureStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the store reads from.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// File holding `player`'s features.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidName`] for blank names and names that
    /// could escape the store directory.
    pub fn path_for(&self, player: &str) -> Result<Utf8PathBuf, FeatureError> {
        let parts: Vec<&str> = player.split_whitespace().collect();
        let escapes = parts
            .iter()
            .any(|part| part.contains(['/', '\\']) || part.starts_with('.'));
        if parts.is_empty() || escapes {
            return Err(FeatureError::InvalidName {
                player: player.to_owned(),
            });
        }
        Ok(self
            .dir
            .join(format!("{}.{FEATURE_EXTENSION}", parts.join("_"))))
    }

    /// Loads and splits `player`'s feature file.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError`] when the file is missing, malformed, or
    /// lacks the observed value.
    pub async fn load(&self, player: &str) -> Result<PlayerFeatures, FeatureError> {
        let path = self.path_for(player)?;
        let contents = tokio::fs::read(&path)
            .await
            .map_err(|source| FeatureError::Read {
                path: path.clone(),
                source,
            })?;
        let document: Value =
            serde_json::from_slice(&contents).map_err(|source| FeatureError::Parse {
                path: path.clone(),
                source,
            })?;
        let Value::Object(mut values) = document else {
            return Err(FeatureError::NotAnObject { path });
        };
        let observed = values
            .remove(OBSERVED_FEATURE)
            .ok_or(FeatureError::MissingObserved { path })?;
        Ok(PlayerFeatures {
            features: FeatureSet::from(values),
            observed,
        })
    }
}
