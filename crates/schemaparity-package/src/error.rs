//! Errors raised while opening packages and parsing their documents
//!
//! All of these are fatal for a comparison run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for package operations
pub type Result<T> = std::result::Result<T, PackageError>;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Input does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to extract package archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },

    #[error("Failed to parse {file}: {message}")]
    Xml { file: String, message: String },

    #[error("{file} has no {section} section")]
    MissingSection { file: String, section: &'static str },
}
