//! Error types for lansweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Only input validation
//! and export failures surface as errors; probe-level failures (timeouts,
//! refused connections, unreachable hosts) are normalized into `Offline` /
//! closed-port outcomes and never reach these types.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for target range parsing and validation.
#[derive(Debug, Clone, Error)]
pub enum RangeError {
    #[error("invalid CIDR range '{0}'")]
    InvalidCidr(String),

    #[error("range '{0}' too large: {1} addresses (max: {2})")]
    TooLarge(String, u64, u64),

    #[error("no target ranges given")]
    Empty,
}

/// Result type alias for range operations.
pub type RangeResult<T> = Result<T, RangeError>;

/// Error type for session export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV formatting failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error type for the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
