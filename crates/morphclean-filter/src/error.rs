//! Error types for morphclean-filter

use morphclean_core::ErrorKind;
use morphclean_morph::MorphError;
use morphclean_region::RegionError;
use thiserror::Error;

/// Errors that can occur in the cleanup pipeline
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morphclean_core::Error),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] MorphError),

    /// Region processing error
    #[error("region error: {0}")]
    Region(#[from] RegionError),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Malformed cleanup sequence string
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
}

impl FilterError {
    /// Map this error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilterError::Core(e) => e.kind(),
            FilterError::Morph(e) => e.kind(),
            FilterError::Region(e) => e.kind(),
            FilterError::InvalidParameters(_) | FilterError::InvalidSequence(_) => {
                ErrorKind::Configuration
            }
        }
    }
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
