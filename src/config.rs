//! File configuration for the `metro` binary.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [data]
//! stations = "stations.csv"
//! connections = "connections.csv"
//! delimiter = ";"
//!
//! [load]
//! duplicates = "replace"   # or "reject"
//!
//! [query]
//! profile = "weight"       # "off-peak", "am-peak", "inter-peak"
//! strategy = "linear-scan" # or "binary-heap"
//! timeout_ms = 500
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::dijkstra::{QueryOptions, SearchStrategy};
use crate::loader::LoadOptions;
use crate::network::DuplicatePolicy;
use crate::profile::WeightProfile;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Delimiter {0:?} must be a single ASCII character.")]
    InvalidDelimiter(char),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data: DataConfig,
    pub load: LoadConfig,
    pub query: QueryConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub stations: PathBuf,
    pub connections: PathBuf,
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            stations: PathBuf::from("stations.csv"),
            connections: PathBuf::from("connections.csv"),
            delimiter: ';',
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    pub duplicates: DuplicatePolicy,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub profile: WeightProfile,
    pub strategy: SearchStrategy,
    pub timeout_ms: Option<u64>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_options(&self) -> Result<LoadOptions, ConfigError> {
        let delimiter = self.data.delimiter;
        if !delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(delimiter));
        }
        Ok(LoadOptions { delimiter: delimiter as u8, duplicates: self.load.duplicates })
    }

    // The timeout starts counting when this is called.
    pub fn query_options(&self) -> QueryOptions<'static> {
        let options = QueryOptions::default()
            .with_profile(self.query.profile)
            .with_strategy(self.query.strategy);
        match self.query.timeout_ms {
            Some(timeout_ms) => options.with_timeout(Duration::from_millis(timeout_ms)),
            None => options,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.load_options().unwrap(), LoadOptions::default());

        let options = config.query_options();
        assert_eq!(options.profile, WeightProfile::Weight);
        assert_eq!(options.strategy, SearchStrategy::LinearScan);
        assert!(options.deadline.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml(
            r#"
            [data]
            stations = "london/stations.csv"
            delimiter = ","

            [load]
            duplicates = "reject"

            [query]
            profile = "am-peak"
            strategy = "binary-heap"
            timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.data.stations, PathBuf::from("london/stations.csv"));
        assert_eq!(config.data.connections, PathBuf::from("connections.csv"));
        assert_eq!(
            config.load_options().unwrap(),
            LoadOptions { delimiter: b',', duplicates: DuplicatePolicy::Reject }
        );
        let options = config.query_options();
        assert_eq!(options.profile, WeightProfile::AmPeak);
        assert_eq!(options.strategy, SearchStrategy::BinaryHeap);
        assert!(options.deadline.is_some());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Config::from_toml("[query]\nprofile = \"rush-hour\""), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::from_toml("[data]\nstation = \"typo.csv\""), Err(ConfigError::Parse(_))));

        let config = Config::from_toml("[data]\ndelimiter = \"§\"").unwrap();
        assert!(matches!(config.load_options(), Err(ConfigError::InvalidDelimiter('§'))));
    }

    #[test]
    fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\nstrategy = \"binary-heap\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.query.strategy, SearchStrategy::BinaryHeap);

        let missing = Config::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
