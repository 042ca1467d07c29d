// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger settings
//!
//! Settings come from an optional TOML file. Everything has a default, so an
//! absent `tally.toml` is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "tally.toml";
pub const DEFAULT_DATA_FILE: &str = "tally.jsonl";
pub const DEFAULT_MAX_APPEND_ATTEMPTS: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What an `open_account` event does to an account that is already open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReopenPolicy {
    /// Reset the balance to zero (last open wins)
    #[default]
    Reset,
    /// Refuse with an invalid-sequence error
    Reject,
}

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Event log file
    pub data_path: PathBuf,
    /// Attempts per append before a lost race is reported as a conflict
    pub max_append_attempts: u32,
    pub reopen: ReopenPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            max_append_attempts: DEFAULT_MAX_APPEND_ATTEMPTS,
            reopen: ReopenPolicy::default(),
        }
    }
}

impl Config {
    /// Parse configuration text. Relative paths are kept as written.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()
    }

    /// Load a config file; a relative `data_path` is resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text, path)?;
        if config.data_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data_path = dir.join(&config.data_path);
            }
        }
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), otherwise `tally.toml` in the
    /// working directory if present, otherwise defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(fallback)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_max_append_attempts(mut self, attempts: u32) -> Self {
        self.max_append_attempts = attempts;
        self
    }

    pub fn with_reopen(mut self, reopen: ReopenPolicy) -> Self {
        self.reopen = reopen;
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_append_attempts == 0 {
            return Err(ConfigError::Invalid(
                "max_append_attempts must be at least 1".to_string(),
            ));
        }
        if self.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_path must not be empty".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
