//! Error types for sitemeta-core

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::format::Format;

/// Result type alias for sitemeta-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sitemeta-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// A file source has an extension that is not json, yaml, yml or toml
    #[error("unsupported data format for '{key}': {path}")]
    UnsupportedFormat {
        /// Destination key of the specification
        key: String,
        /// Source path as written in the specification
        path: String,
    },

    /// Source is missing from the content set or from disk
    #[error("metadata source for '{key}' not found: {path}")]
    NotFound {
        /// Destination key of the specification
        key: String,
        /// Path that was looked up
        path: String,
    },

    /// Local directory source with no data files in it
    #[error("metadata directory for '{key}' contains no data files: {path}")]
    EmptyDirectory {
        /// Destination key of the specification
        key: String,
        /// Directory prefix within the content root
        path: String,
    },

    /// Bytes exist but are not valid data in the declared format
    #[error("malformed {format} in {path}: {message}")]
    MalformedData {
        /// Offending file
        path: String,
        /// Format the file was parsed as
        format: Format,
        /// Parser message
        message: String,
    },

    /// Disk read failure on an external source
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File or directory being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// External source did not resolve in time
    #[error("reading metadata for '{key}' from {path} timed out after {limit:?}")]
    Timeout {
        /// Destination key of the specification
        key: String,
        /// Source path as written in the specification
        path: String,
        /// Configured limit
        limit: Duration,
    },

    /// An aggregator was asked to run a second time
    #[error("aggregation already ran")]
    AlreadyRun,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
