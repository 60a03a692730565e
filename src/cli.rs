use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{GeneratorConfig, TempIdStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// C test module
    #[default]
    C,
    /// Parsed test-data file as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tdgen")]
#[command(about = "Generate C unit-test modules from test-data files", long_about = None)]
pub struct Args {
    /// Input test-data file, relative to the tests directory
    #[arg(short, long, value_name = "FILE", required_unless_present = "all")]
    pub infile: Option<PathBuf>,

    /// Output file, relative to the codegen directory
    #[arg(short, long, value_name = "FILE", required_unless_present = "all")]
    pub outfile: Option<PathBuf>,

    /// Names to #include in the generated module, in order
    #[arg(short = 'I', long, value_name = "NAMES", num_args = 0..)]
    pub includes: Vec<String>,

    /// Directory test-data files are read from [default: tests/]
    #[arg(long, value_name = "DIR")]
    pub tests: Option<PathBuf>,

    /// Directory generated files are written to [default: build/tests/]
    #[arg(long, value_name = "DIR")]
    pub codegen: Option<PathBuf>,

    /// Generate every *.tdata file under the tests directory, stopping at the
    /// first file that fails
    #[arg(long, conflicts_with_all = ["infile", "outfile"])]
    pub all: bool,

    /// Output format (c, json)
    #[arg(short = 'f', long, default_value = "c")]
    pub format: OutputFormat,

    /// Ignore text between literals in data rows
    #[arg(long)]
    pub permissive: bool,

    /// Generator config file (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Temporary identifier strategy
    #[arg(long, value_name = "STRATEGY")]
    pub temp_ids: Option<TempIdStrategy>,

    /// Fixed salt for sequential temporary identifiers
    #[arg(long, value_name = "SALT", requires = "temp_ids")]
    pub salt: Option<String>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref config_path) = self.config {
            if !config_path.is_file() {
                anyhow::bail!("Config file does not exist: {}", config_path.display());
            }
        }
        if let Some(ref tests) = self.tests {
            validate_dir(tests)?;
        }
        Ok(())
    }

    /// Config file values with command-line flags applied on top.
    /// Command-line includes follow the config file's.
    pub fn to_config(&self) -> Result<GeneratorConfig> {
        let mut config = match self.config {
            Some(ref path) => GeneratorConfig::load(path)
                .with_context(|| format!("Cannot load config: {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(ref tests) = self.tests {
            config.tests_dir = tests.clone();
        }
        if let Some(ref codegen) = self.codegen {
            config.codegen_dir = codegen.clone();
        }
        config.includes.extend(self.includes.iter().cloned());
        if self.permissive {
            config.strict_rows = false;
        }
        if let Some(strategy) = self.temp_ids {
            config.temp_ids = strategy;
            if strategy == TempIdStrategy::Random {
                config.salt = None;
            }
        }
        if self.salt.is_some() {
            config.salt = self.salt.clone();
        }

        config.validate().context("Invalid generator settings")?;
        Ok(config)
    }
}

pub fn validate_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Directory does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }
    std::fs::metadata(path).with_context(|| format!("Cannot read directory: {}", path.display()))?;
    Ok(())
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::C => "c",
            OutputFormat::Json => "json",
        }
    }

    /// Extension of files generated in batch mode.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}
