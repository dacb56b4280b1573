//! Chart-file error types.
//!
//! Three classes are kept apart: I/O failures and decode failures pass
//! through with their original message, while chart-directory checks
//! produce fixed, user-facing messages.

use std::path::PathBuf;

use chartkit_core::ValidationError;
use thiserror::Error;

use crate::chartfile::CHARTFILE_NAME;

/// Errors raised while reading, writing, or checking chart files.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Filesystem failure, passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML encode or decode failure, passed through unchanged.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Strict decoding met a key the schema does not know.
    #[error("unknown field `{path}`")]
    UnknownField { path: String },

    /// The chart path exists but is a file.
    #[error("{:?} is not a directory", .path)]
    NotADirectory { path: PathBuf },

    /// The chart directory has no `Chart.yaml`.
    #[error("no {} exists in directory {:?}", CHARTFILE_NAME, .dir)]
    ChartfileMissing { dir: PathBuf },

    /// `Chart.yaml` exists but could not be read. The message is stable;
    /// the underlying I/O error is available through `source()`.
    #[error("cannot read {} in directory {:?}", CHARTFILE_NAME, .dir)]
    Unreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `Chart.yaml` decoded to nothing (empty file or a `null` document).
    #[error("chart metadata ({}) missing", CHARTFILE_NAME)]
    MetadataMissing,

    /// `Chart.yaml` decoded but carries no name.
    #[error("invalid chart ({}): name must not be empty", CHARTFILE_NAME)]
    EmptyName,

    /// A chart rule was broken.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ChartError {
    /// The I/O error kind behind this error, if any.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) | Self::Unreadable { source: e, .. } => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type alias for chart-file operations.
pub type ChartResult<T> = Result<T, ChartError>;
