mod config;
mod io;
mod parse;
mod template;

pub use config::ConfigError;
pub use io::IoError;
pub use parse::{ParseError, ParseErrorKind};
pub use template::TemplateError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize suite: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
