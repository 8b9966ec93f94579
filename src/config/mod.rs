// gitdeck: Desktop Git Client Engine
//
// SPDX-FileCopyrightText: 2026 gitdeck contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitdeck.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitdeck.toml (cwd)
//! 3. --config FILE
//! 4. GITDECK_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITDECK_GLOBAL_LOG_LEVEL=4      → global.log_level = 4
//! GITDECK_GIT_BINARY=/usr/bin/git → git.binary = "/usr/bin/git"
//! GITDECK_GIT_TIMEOUT_SECS=120    → git.timeout_secs = 120
//! ```

pub mod loader;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::git::runner::SystemRunner;
use crate::logging::LogLevel;

use loader::ConfigLoader;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git subprocess options.
    pub git: GitConfig,
}

/// Global options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Console log level (0-5).
    pub log_level: Option<LogLevel>,
    /// File log level, falls back to `log_level`.
    pub file_log_level: Option<LogLevel>,
    /// Path of the log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

/// Git subprocess options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Explicit git binary; resolved from PATH when unset.
    pub binary: Option<PathBuf>,
    /// Deadline in seconds applied to every git invocation.
    pub timeout_secs: Option<u64>,
    /// Extra environment variables for every git invocation.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitdeck::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitdeck.toml")
    ///     .with_env_prefix("GITDECK")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML,
    /// or does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match
    /// the `Config` structure.
    pub fn from_str(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Build the production runner this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error when no git binary is configured and none is found
    /// on PATH.
    pub fn runner(&self) -> Result<SystemRunner> {
        let mut runner = match &self.git.binary {
            Some(binary) => SystemRunner::new(binary.clone()),
            None => SystemRunner::from_path()?,
        };
        if let Some(secs) = self.git.timeout_secs {
            runner = runner.with_timeout(Duration::from_secs(secs));
        }
        for (key, value) in &self.git.env {
            runner = runner.with_env(key.clone(), value.clone());
        }
        Ok(runner)
    }
}
