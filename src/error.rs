use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a stream or setting up an experiment.
///
/// The counters themselves never fail; unknown items simply query as 0.
#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset not found at '{}'", .0.display())]
    SourceNotFound(PathBuf),

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("column '{0}' not present in header")]
    MissingColumn(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
