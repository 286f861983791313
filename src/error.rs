//! Error types for the telegram-raw-loader library.
//!
//! This module provides custom error types using `thiserror` so every stage
//! of a load (configuration, partition discovery, parsing, database) reports
//! a specific, descriptive failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a partition.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Missing or invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Partition date that is not a `YYYY-MM-DD` calendar date
    #[error("Invalid partition date: {0}")]
    InvalidPartition(String),

    /// Partition directory does not exist
    #[error("Directory not found: {}", .0.display())]
    PartitionNotFound(PathBuf),

    /// File I/O errors while listing or reading a partition
    #[error("File I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed message file
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Could not open the database connection
    #[error("Database connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    /// Schema, insert or query failure
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Logging subscriber could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Convenience type alias for Result with `LoaderError`
pub type Result<T> = std::result::Result<T, LoaderError>;

impl From<config::ConfigError> for LoaderError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl LoaderError {
    /// Short label for the pipeline stage the error belongs to, used as a metrics label.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Logging(_) => "config",
            Self::InvalidPartition(_) | Self::PartitionNotFound(_) | Self::Io { .. } => "discovery",
            Self::Parse { .. } => "parse",
            Self::Connection(_) => "connect",
            Self::Database(_) => "database",
        }
    }
}
