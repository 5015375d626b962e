//! TOML configuration for the capsync CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use capsync_convert::ConvertOptions;
use capsync_host::{CandidateFields, NativeSchema, Placement};
use serde::Deserialize;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG: &str = "capsync.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema: NativeSchema,
    pub accessor: AccessorConfig,
    pub batch: BatchConfig,
    pub convert: ConvertOptions,
}

/// Where the hidden center field may live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    pub center_fields: Vec<String>,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            center_fields: CandidateFields::default().fields().to_vec(),
        }
    }
}

impl AccessorConfig {
    pub fn accessor(&self) -> CandidateFields {
        CandidateFields::new(self.center_fields.iter().cloned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub placement: Placement,
}

/// Parse a configuration from TOML text.
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).context("invalid configuration")
}

/// Load the configuration from `path`, or from [`DEFAULT_CONFIG`] if it exists.
///
/// Falls back to defaults when no file is given and none is found.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if !default.exists() {
                log::debug!("no {DEFAULT_CONFIG} found, using defaults");
                return Ok(Config::default());
            }
            default
        }
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in {}", path.display()))
}
