//! Error types for loading profiler captures and threshold documents

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a run before any statistics are computed.
#[derive(Error, Debug)]
pub enum ProfilerError {
    #[error("File not found: {}", path.display())]
    MetricsNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    MetricsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    MalformedMetrics {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No samples found in profiler output: {}", path.display())]
    NoSamples { path: PathBuf },
}

/// Problems with an optional threshold document.
///
/// These never abort a run; the loader falls back to the built-in policy.
#[derive(Error, Debug)]
pub enum ThresholdError {
    #[error("Failed to read thresholds file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse thresholds file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported thresholds format (expected .json or .toml): {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ProfilerError>;
