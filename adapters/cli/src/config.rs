//! `delve.toml` configuration layered under command-line overrides.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use delve_world::DEFAULT_SEED;
use serde::Deserialize;

/// Configuration file consulted when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "delve.toml";

const DEFAULT_UPLOAD_BATCH_SIZE: usize = 4;

/// Fully resolved runtime configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) session: SessionConfig,
    pub(crate) ledger: LedgerConfig,
}

/// `[session]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionConfig {
    /// Seed for chest rewards.
    pub(crate) seed: u64,
    /// Level document to load instead of the built-in catalogue.
    pub(crate) levels: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            levels: None,
        }
    }
}

/// `[ledger]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LedgerConfig {
    /// JSON-lines file receiving ledger entries.
    pub(crate) journal: Option<PathBuf>,
    /// Levels per upload batch.
    pub(crate) upload_batch_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            journal: None,
            upload_batch_size: DEFAULT_UPLOAD_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, `delve.toml` in the working
    /// directory is used when present and defaults otherwise.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").expect("empty config is valid");
        assert_eq!(config, Config::default());
        assert_eq!(config.session.seed, DEFAULT_SEED);
        assert_eq!(config.ledger.upload_batch_size, DEFAULT_UPLOAD_BATCH_SIZE);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = Config::parse(
            r#"
            [session]
            seed = 42

            [ledger]
            journal = "ledger.jsonl"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.session.seed, 42);
        assert_eq!(config.session.levels, None);
        assert_eq!(config.ledger.journal, Some(PathBuf::from("ledger.jsonl")));
        assert_eq!(config.ledger.upload_batch_size, DEFAULT_UPLOAD_BATCH_SIZE);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[session]\nsped = 1\n").is_err());
    }
}
