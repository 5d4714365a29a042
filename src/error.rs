// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for gila-csp
//!
//! Configuration errors (unknown presets, bad config files) are fatal and
//! surface before any HTML file is touched. I/O errors carry the path that
//! failed so batch runs are debuggable.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for gila-csp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gila-csp
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the path that caused it
    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown preset name in configuration
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an I/O error tagged with a path
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoAt {
            path: path.into(),
            source,
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a configuration error (unknown preset included)
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_) | Error::UnknownPreset(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
