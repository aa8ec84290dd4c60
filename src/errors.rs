//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the failures
//! that can occur while validating inputs, walking trees, rendering, and
//! finalizing output, offering more context than generic I/O errors.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type used throughout the `ctx` library.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-specific errors used throughout `ctx`.
#[derive(Error, Debug)]
pub enum Error {
    /// The operation was cancelled (Ctrl+C or a cancelled context).
    #[error("operation cancelled")]
    Cancelled,

    /// An input path does not exist on disk.
    #[error("path does not exist: {0}")]
    PathMissing(PathBuf),

    /// An input path exists but could not be stat'ed.
    #[error("unable to stat '{path}': {source}")]
    PathStat {
        /// The path that failed to stat.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// An ignore pattern failed to compile.
    #[error("malformed ignore pattern '{pattern}': {reason}")]
    PatternMalformed {
        /// The raw pattern text.
        pattern: String,
        /// Why compilation failed.
        reason: String,
    },

    /// The embedded tokenizer has no tables for the requested model.
    ///
    /// Fatal only when token counting was requested; callers match on this
    /// variant to decide.
    #[error("tokenizer does not support model '{model}'")]
    TokenizerUnavailable {
        /// The model name that could not be resolved.
        model: String,
    },

    /// A file or directory could not be accessed due to permissions.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A file could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        /// The path that failed to read.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// A file's bytes could not be decoded as UTF-8 text.
    #[error("failed to decode '{0}' as UTF-8")]
    DecodeFailed(String),

    /// The remote documentation provider could not be reached.
    #[error("remote documentation provider unavailable: {0}")]
    RemoteUnavailable(String),

    /// Clipboard access failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// The requested output format is not one of raw/toon/json/xml.
    #[error("unsupported output format: {0}")]
    FormatUnsupported(String),

    /// The requested documentation mode is not recognized.
    #[error("invalid documentation mode: {0} (expected disabled, relevant, or full)")]
    DocModeInvalid(String),

    /// Every supplied input path was invalid.
    #[error("no valid paths were provided")]
    NoValidPaths,

    /// Generic I/O error with path context.
    #[error("I/O error accessing '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// An error writing to the output sink.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    /// A failure while serializing a tree snapshot.
    #[error("render error: {0}")]
    Render(String),
}

impl Error {
    /// Returns `true` for the cancellation sentinel.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Render(source.to_string())
    }
}

/// Helper to build an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

/// Helper to build an `Error::ReadFailed` with path context.
pub fn read_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::ReadFailed {
        path: path.as_ref().display().to_string(),
        source,
    }
}
