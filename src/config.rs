//! Configuration loading
//!
//! The extractor is driven by a small TOML file with two sections:
//! `[postgres]` for the connection and `[files]` for the query batch,
//! the CSV destination and the error log.

use crate::error::{FeatureError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub postgres: PostgresConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// File holding the semicolon-delimited query batch
    pub queries: PathBuf,

    /// CSV destination for the feature records
    pub csv: PathBuf,

    /// Per-query failure log
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,
}

fn default_port() -> u16 {
    5432
}

fn default_error_log() -> PathBuf {
    PathBuf::from("query_errors.log")
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).map_err(|e| {
            FeatureError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            FeatureError::Config(format!("cannot parse {}: {}", path.display(), e))
        })
    }
}
