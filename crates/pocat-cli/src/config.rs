//! Optional `pocat.toml` configuration.

use std::fs;
use std::path::Path;

use miette::{miette, Result};
use pocat::formatter::DEFAULT_WIDTH;
use serde::Deserialize;
use toml::de::Error as TomlError;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pocat.toml";

/// Settings shared by all commands. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Line width for `fmt`. Leaving it out of the file disables wrapping.
    #[serde(default)]
    pub wrap_width: Option<usize>,

    /// Make `lint` fail on any warning.
    #[serde(default)]
    pub strict_lint: bool,

    /// Language the message-ids are written in, shown by `stats`.
    #[serde(default)]
    pub source_language: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wrap_width: Some(DEFAULT_WIDTH),
            strict_lint: false,
            source_language: None,
        }
    }
}

impl Config {
    /// Load the explicit config file, or `./pocat.toml` if it exists, or
    /// fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Config::default()),
        };
        let content = fs::read_to_string(path)
            .map_err(|e| miette!("Cannot read config file {}: {}", path.display(), e))?;
        Config::parse(&content).map_err(|e| miette!("Invalid config file {}: {}", path.display(), e))
    }

    fn parse(content: &str) -> Result<Config, TomlError> {
        toml::from_str(content)
    }
}
