//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while generating a site
#[derive(Debug, Error)]
pub enum Error {
    /// A required directory or setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The post source could not be split into header and body
    #[error("Malformed post: {reason}")]
    MalformedPost { reason: String },

    /// A required front-matter field is absent
    #[error("Missing required front-matter field: {field}")]
    MissingField { field: &'static str },

    /// A front-matter field is present but unusable
    #[error("Invalid front-matter field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A single static asset failed to copy
    #[error("Failed to copy asset {path:?}: {source}")]
    AssetCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Highlight error: {0}")]
    Highlight(#[from] syntect::Error),

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
