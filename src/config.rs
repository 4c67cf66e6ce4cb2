//! Loader configuration: where season files live and which seasons exist.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatcastError};

/// Environment variable overriding [`LoaderConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "STATCAST_DATA_DIR";

// ---------------------------------------------------------------------------
// SeasonSet – the enumerable set of valid seasons
// ---------------------------------------------------------------------------

/// Immutable, ordered set of season identifiers a loader accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonSet(BTreeSet<u16>);

impl SeasonSet {
    /// Inclusive range of seasons.
    pub fn range(first: u16, last: u16) -> Self {
        SeasonSet((first..=last).collect())
    }

    pub fn contains(&self, season: u16) -> bool {
        self.0.contains(&season)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn first(&self) -> Option<u16> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<u16> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u16> for SeasonSet {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        SeasonSet(iter.into_iter().collect())
    }
}

impl fmt::Display for SeasonSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) if self.len() == usize::from(b - a) + 1 => write!(f, "{a}-{b}"),
            _ => {
                let list: Vec<String> = self.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", list.join(", "))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_seasons")]
    pub seasons: SeasonSet,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_file_prefix() -> String {
    "statcast".to_string()
}

fn default_seasons() -> SeasonSet {
    SeasonSet::range(2015, 2025)
}

fn default_batch_size() -> usize {
    65_536
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_prefix: default_file_prefix(),
            seasons: default_seasons(),
            batch_size: default_batch_size(),
        }
    }
}

impl LoaderConfig {
    /// Read a JSON config file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: LoaderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which a load could not return every row.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(StatcastError::InvalidSetting {
                field: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Apply `STATCAST_DATA_DIR` if it is set.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => self.with_data_dir(dir),
            _ => self,
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_seasons(mut self, seasons: SeasonSet) -> Self {
        self.seasons = seasons;
        self
    }

    /// Path of the single-file form of a season.
    pub fn season_path(&self, season: u16) -> PathBuf {
        self.data_dir
            .join(format!("{}_{season}.parquet", self.file_prefix))
    }

    /// Path of one monthly partition of a season.
    pub fn partition_path(&self, season: u16, month: u8) -> PathBuf {
        self.data_dir
            .join(format!("{}_{season}_{month:02}.parquet", self.file_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = LoaderConfig::default();
        assert_eq!(cfg.seasons.first(), Some(2015));
        assert_eq!(cfg.seasons.last(), Some(2025));
        assert_eq!(cfg.seasons.len(), 11);
        assert_eq!(
            cfg.season_path(2024),
            PathBuf::from("data/raw/statcast_2024.parquet")
        );
        assert_eq!(
            cfg.partition_path(2024, 4),
            PathBuf::from("data/raw/statcast_2024_04.parquet")
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: LoaderConfig =
            serde_json::from_str(r#"{ "data_dir": "/tmp/sc", "seasons": [2023, 2024] }"#).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/sc"));
        assert!(cfg.seasons.contains(2023));
        assert!(!cfg.seasons.contains(2022));
        assert_eq!(cfg.file_prefix, "statcast");
        assert_eq!(cfg.batch_size, 65_536);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let cfg: LoaderConfig = serde_json::from_str(r#"{ "batch_size": 0 }"#).unwrap();
        match cfg.validate() {
            Err(StatcastError::InvalidSetting { field, .. }) => assert_eq!(field, "batch_size"),
            other => panic!("expected InvalidSetting, got {other:?}"),
        }
        assert!(LoaderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_season_set_display() {
        assert_eq!(SeasonSet::range(2015, 2025).to_string(), "2015-2025");
        let sparse: SeasonSet = [2019, 2021].into_iter().collect();
        assert_eq!(sparse.to_string(), "2019, 2021");
    }
}
