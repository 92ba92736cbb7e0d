//! Error types for the regression harness

use morphclean_io::IoError;
use thiserror::Error;

/// Errors that stop a regression check from running at all
///
/// A check that runs and fails is not an error; it is recorded by
/// [`RegParams`](crate::RegParams) and reported by `cleanup`.
#[derive(Debug, Error)]
pub enum TestError {
    /// The output image could not be encoded or written
    #[error("failed to write regression output '{path}': {source}")]
    ImageWrite {
        path: String,
        #[source]
        source: IoError,
    },

    /// Copying or reading a golden file failed
    #[error("golden file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for harness operations
pub type TestResult<T> = Result<T, TestError>;
