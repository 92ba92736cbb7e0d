//! Error types for morphclean-region

use morphclean_core::ErrorKind;
use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morphclean_core::Error),

    /// An iterate-to-fixed-point loop did not converge within its cap
    #[error("no fixed point after {iterations} iterations (cap {cap})")]
    ConvergenceFailed { iterations: u64, cap: u64 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl RegionError {
    /// Map this error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegionError::Core(e) => e.kind(),
            RegionError::ConvergenceFailed { .. } => ErrorKind::Convergence,
            RegionError::InvalidParameters(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
