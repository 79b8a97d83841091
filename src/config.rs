//! Runtime configuration.
//!
//! The engine itself is configuration-free; the only knobs are where the
//! place index lives and how many short codes callers get by default.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the place index file.
pub const INDEX_ENV: &str = "PLUSPLACE_INDEX";

/// Environment variable overriding the default number of short codes.
pub const LIMIT_ENV: &str = "PLUSPLACE_LIMIT";

/// Number of short codes returned when the caller does not ask for a count.
pub const DEFAULT_LIMIT: usize = 5;

/// Settings for loading the index and sizing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to a packed (`.bin`) or JSON (`.json`) place index.
    #[serde(default)]
    pub index_path: Option<PathBuf>,
    /// Default length of short code listings.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: None,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl Config {
    /// Reads `PLUSPLACE_INDEX` and `PLUSPLACE_LIMIT`, falling back to defaults.
    ///
    /// An unparseable limit is reported rather than silently ignored.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = var(INDEX_ENV).filter(|p| !p.trim().is_empty()) {
            config.index_path = Some(PathBuf::from(path));
        }

        if let Some(limit) = var(LIMIT_ENV) {
            config.default_limit = match limit.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(Error::Config(format!("{LIMIT_ENV}={limit}"))),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_vars(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_limit, 5);
    }

    #[test]
    fn reads_index_path_and_limit() {
        let config = Config::from_vars(|key| match key {
            INDEX_ENV => Some("/var/lib/places.bin".into()),
            LIMIT_ENV => Some("3".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.index_path, Some(PathBuf::from("/var/lib/places.bin")));
        assert_eq!(config.default_limit, 3);
    }

    #[test]
    fn rejects_zero_limit() {
        let err = Config::from_vars(|key| (key == LIMIT_ENV).then(|| "0".to_string()));
        assert!(matches!(err, Err(Error::Config(_))));
    }
}
