//! tdgen
//!
//! Generates self-contained C unit-test programs from test-data files: a
//! code template per test, expanded once for every row of literal values.
pub mod cli;
pub mod config;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod expand;
pub mod generate;
pub mod literal;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod tempid;
pub mod template;
pub mod utils;

pub use config::GeneratorConfig;
pub use error::{Error, Result};
pub use generate::Generator;
pub use model::{ArgumentRow, SuiteFile, Test};
