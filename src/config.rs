use serde::Deserialize;
use std::{fmt, fs};
use thiserror::Error;

/// The configuration file that is loaded if no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// One repository pair: mirror everything from the source to the target.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub struct SyncTarget {
    /// The repository to fetch from.
    pub source: String,
    /// The repository to push to.
    pub target: String,
}

impl fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// The process-wide configuration, loaded once at startup and immutable afterwards.
///
/// The field names follow the camelCase keys of the JSON file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Remove the local mirrors and clone them again on startup.
    #[serde(default)]
    pub clean_repo_on_run: bool,
    /// Run a single cycle for every repository, then exit.
    #[serde(default)]
    pub only_run_once: bool,
    /// Seconds between the starts of two sync cycles.
    pub sync_interval_seconds: u64,
    /// The repository pairs to keep in sync.
    pub sync_repositories: Vec<SyncTarget>,
}

/// A custom error describing the error cases for the configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file cannot be opened or read.
    #[error("cannot read {path}: {source}")]
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },
    /// The configuration file is not valid JSON or misses required fields.
    #[error("cannot parse {path}: {source}")]
    InvalidFile {
        path: String,
        source: serde_json::Error,
    },
    /// The sync interval is zero, which would busy-loop the schedulers.
    #[error("syncIntervalSeconds has to be greater than zero")]
    InvalidInterval,
}

impl Config {
    /// Load and validate the configuration from a JSON file.
    pub fn load(path: &str) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::UnreadableFile {
            path: path.to_string(),
            source,
        })?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::InvalidFile {
                path: path.to_string(),
                source,
            })?;

        if config.sync_interval_seconds == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn it_should_load_a_full_configuration() {
        let file = write_config(
            r#"{
                "cleanRepoOnRun": true,
                "onlyRunOnce": true,
                "syncIntervalSeconds": 30,
                "syncRepositories": [
                    { "source": "https://example.com/a.git", "target": "https://example.com/b.git" }
                ]
            }"#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert!(config.clean_repo_on_run);
        assert!(config.only_run_once);
        assert_eq!(30, config.sync_interval_seconds);
        assert_eq!(
            vec![SyncTarget {
                source: String::from("https://example.com/a.git"),
                target: String::from("https://example.com/b.git"),
            }],
            config.sync_repositories
        );
    }

    #[test]
    fn it_should_default_the_booleans_to_false() {
        let file = write_config(r#"{ "syncIntervalSeconds": 60, "syncRepositories": [] }"#);

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert!(!config.clean_repo_on_run);
        assert!(!config.only_run_once);
    }

    #[test]
    fn it_should_fail_on_a_missing_file() {
        let result = Config::load("definitely-no-such-config.json");
        assert!(
            matches!(result, Err(ConfigError::UnreadableFile { .. })),
            "{result:?} should be UnreadableFile"
        );
    }

    #[test]
    fn it_should_fail_on_invalid_json() {
        let file = write_config("{ not json");

        let result = Config::load(file.path().to_str().unwrap());
        assert!(
            matches!(result, Err(ConfigError::InvalidFile { .. })),
            "{result:?} should be InvalidFile"
        );
    }

    #[test]
    fn it_should_fail_on_a_missing_interval() {
        let file = write_config(r#"{ "syncRepositories": [] }"#);

        let result = Config::load(file.path().to_str().unwrap());
        assert!(
            matches!(result, Err(ConfigError::InvalidFile { .. })),
            "{result:?} should be InvalidFile"
        );
    }

    #[test]
    fn it_should_fail_on_a_zero_interval() {
        let file = write_config(r#"{ "syncIntervalSeconds": 0, "syncRepositories": [] }"#);

        let result = Config::load(file.path().to_str().unwrap());
        assert!(
            matches!(result, Err(ConfigError::InvalidInterval)),
            "{result:?} should be InvalidInterval"
        );
    }

    #[test]
    fn it_should_display_a_pair_as_source_to_target() {
        let target = SyncTarget {
            source: String::from("a.git"),
            target: String::from("b.git"),
        };

        assert_eq!("a.git -> b.git", target.to_string());
    }
}
