//! Unified error types for the confine workspace.
//!
//! Domain crates keep their own fine-grained error enums and convert into
//! [`ConfineError`] at their public boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ConfineError {
    /// Opening or reading a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line did not conform to the expected grammar.
    #[error("malformed entry at {path}:{line}: {reason}")]
    Format {
        /// Path of the file being parsed.
        path: PathBuf,
        /// 1-based line number of the offending line.
        line: usize,
        /// Why the line was rejected.
        reason: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl ConfineError {
    /// Returns `true` for failures to open or read the source.
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns `true` for grammar violations in the source.
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ConfineError>;
