use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::emit::DEFAULT_PROGRESS_WIDTH;
use crate::error::ConfigError;
use crate::tempid::{RandomIds, SequentialIds, TempIdSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TempIdStrategy {
    /// UUIDv4-based identifiers
    #[default]
    Random,
    /// Salted per-run counter
    Sequential,
}

/// Generator settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory test-data files are read from.
    pub tests_dir: PathBuf,
    /// Directory generated sources are written to.
    pub codegen_dir: PathBuf,
    /// Include names emitted before any given on the command line.
    pub includes: Vec<String>,
    pub progress_width: usize,
    /// Reject data rows containing anything but literals and separators.
    pub strict_rows: bool,
    pub temp_ids: TempIdStrategy,
    /// Fixed salt for sequential identifiers.
    pub salt: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from("tests/"),
            codegen_dir: PathBuf::from("build/tests/"),
            includes: Vec::new(),
            progress_width: DEFAULT_PROGRESS_WIDTH,
            strict_rows: true,
            temp_ids: TempIdStrategy::Random,
            salt: None,
        }
    }
}

impl GeneratorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading generator config");

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path, e.to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config: Self = match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            _ => return Err(ConfigError::unsupported_format(extension)),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_width == 0 {
            return Err(ConfigError::invalid_value(
                "progress_width",
                "must be greater than zero",
            ));
        }
        if self.salt.is_some() && self.temp_ids != TempIdStrategy::Sequential {
            return Err(ConfigError::invalid_value(
                "salt",
                "only applies to sequential temporary identifiers",
            ));
        }
        if let Some(salt) = &self.salt {
            if salt.is_empty() || !salt.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::invalid_value(
                    "salt",
                    "must be a non-empty run of letters, digits or underscores",
                ));
            }
        }
        Ok(())
    }

    pub fn temp_id_source(&self) -> Box<dyn TempIdSource> {
        match (self.temp_ids, &self.salt) {
            (TempIdStrategy::Random, _) => Box::new(RandomIds::new()),
            (TempIdStrategy::Sequential, Some(salt)) => Box::new(SequentialIds::with_salt(salt)),
            (TempIdStrategy::Sequential, None) => Box::new(SequentialIds::new()),
        }
    }
}
