//! Error types for genpdf

use std::path::PathBuf;

use thiserror::Error;

/// genpdf error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (`.info` files, configuration)
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Invalid grid block construction
    #[error("Validation error: {0}")]
    Validation(String),

    /// Label list is neither pure flavor basis nor pure evolution basis
    #[error("invalid labels: {0}")]
    Labels(String),

    /// Parent source cannot be resolved
    #[error("invalid parent source: {0}")]
    Source(String),

    /// Metadata override is not a mapping
    #[error("invalid info update: {0}")]
    InfoUpdate(String),

    /// Malformed on-disk grid set
    #[error("malformed grid file {path}: line {line}: {message}")]
    Format {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number (0 when the error concerns the whole file)
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Set not present in any registry directory
    #[error("PDF set '{0}' not found in registry")]
    SetNotFound(String),

    /// Set directory to install does not exist
    #[error("set directory {0} does not exist")]
    MissingSet(PathBuf),

    /// Destination already populated
    #[error("{0} already exists")]
    AlreadyInstalled(PathBuf),

    /// Basis rotation table cannot be inverted
    #[error("singular basis rotation: {0}")]
    SingularRotation(String),
}

impl Error {
    /// Build a [`Error::Format`] for `path` at `line`.
    pub fn format(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Format { path: path.into(), line, message: message.into() }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
